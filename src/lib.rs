//! CloudAPI SDK
//!
//! A minimal authenticated HTTP client for the CloudAPI management service.
//!
//! This SDK provides:
//! - Construction-time validation of credentials and log sink
//! - Request signing (HTTP Signatures over RSA/ECDSA keys) or bearer tokens
//! - A single `fetch` operation with query encoding, GET/POST dispatch,
//!   response unwrapping and per-call default fallback
//! - Structured error payloads for remote API failures
//!
//! # Example
//!
//! ```no_run
//! use cloudapi_sdk::{
//!     ClientConfig, CloudApiClient, Environment, Method, RequestOptions, TracingLogSink,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = std::fs::read("/home/demo/.ssh/id_rsa")?;
//!
//! let client = CloudApiClient::new(
//!     ClientConfig::from_env()
//!         .with_key(key)
//!         .with_key_id("/demo/keys/aa:bb:cc")
//!         .with_log(TracingLogSink)
//!         .with_environment(Environment::from("development")),
//! )?;
//!
//! // List running machines
//! let machines = client
//!     .fetch("/my/machines", RequestOptions::new().query("state", "running"))
//!     .await?;
//!
//! // Stop one, falling back to null if the call fails
//! let stopped = client
//!     .fetch(
//!         "/my/machines/abc",
//!         RequestOptions::new()
//!             .method(Method::Post)
//!             .query("action", "stop")
//!             .default_value(serde_json::Value::Null),
//!     )
//!     .await?;
//!
//! println!("{} -> {}", machines.payload(), stopped.payload());
//! # Ok(())
//! # }
//! ```

pub mod cloudapi;
pub mod validation;

// Re-export commonly used types
pub use cloudapi::{
    client::CloudApiClient,
    config::{ClientConfig, Environment, DEFAULT_URL},
    log::{LogData, LogRecord, LogSink, TracingLogSink},
    request::{Method, RequestOptions},
    signer::Signer,
    transport::{HttpTransport, Transport, TransportFuture},
    types::{Envelope, ErrorPayload, FetchError, FetchResult, ResponseMeta},
};
pub use validation::ValidationError;
