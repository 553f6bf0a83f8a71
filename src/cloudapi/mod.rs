/// CloudAPI client module
///
/// Each `fetch` call runs the same pipeline:
///
/// 1. Build the request target from the path and query parameters
/// 2. Send one GET or POST through the transport, authenticated by the signer
/// 3. On success, return the payload (or the full envelope)
/// 4. On failure, log one record and return the caller's default or the error
pub mod client;
pub mod config;
pub mod log;
pub mod request;
pub mod signer;
pub mod transport;
pub mod types;

pub use client::CloudApiClient;
pub use config::{ClientConfig, Environment, DEFAULT_URL};
pub use log::{LogData, LogRecord, LogSink, TracingLogSink};
pub use request::{Method, RequestOptions};
pub use signer::Signer;
pub use transport::{HttpTransport, Transport, TransportFuture};
pub use types::{Envelope, ErrorPayload, FetchError, FetchResult, ResponseMeta};
