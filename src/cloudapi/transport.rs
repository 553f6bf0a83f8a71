use crate::cloudapi::request::Method;
use crate::cloudapi::signer::Signer;
use crate::cloudapi::types::{Envelope, ErrorPayload, FetchError, ResponseMeta};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Future returned by [`Transport`] operations
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Envelope, FetchError>> + Send + 'a>>;

/// Transport trait for executing CloudAPI requests
///
/// `url` is the complete request url (base url plus target). Implementations
/// authenticate the request with `signer` and resolve to the response
/// envelope, or fail with a [`FetchError`]. The client makes exactly one call
/// per `fetch`; retries and timeouts belong to the transport.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str, signer: &'a Signer) -> TransportFuture<'a>;

    fn post<'a>(&'a self, url: &'a str, signer: &'a Signer) -> TransportFuture<'a>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts, TLS)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        signer: &Signer,
    ) -> Result<Envelope, FetchError> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        for (name, value) in signer.auth_headers()? {
            request = request.header(name, value);
        }

        tracing::debug!("Sending {} request to: {}", method, url);

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send {} request: {}", method, e);
                FetchError::from(e)
            })?;

        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        tracing::debug!("Received response with status: {}", status);

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            FetchError::from(e)
        })?;

        if !status.is_success() {
            return Err(FetchError::Api(error_payload(status.as_u16(), &body)));
        }

        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                tracing::error!("Failed to parse response: {} - Response body: {}", e, body);
                FetchError::Parse(format!("Failed to parse response JSON: {}", e))
            })?
        };

        Ok(Envelope {
            payload,
            res: ResponseMeta {
                status: status.as_u16(),
                headers,
            },
        })
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str, signer: &'a Signer) -> TransportFuture<'a> {
        Box::pin(self.send(Method::Get, url, signer))
    }

    fn post<'a>(&'a self, url: &'a str, signer: &'a Signer) -> TransportFuture<'a> {
        Box::pin(self.send(Method::Post, url, signer))
    }
}

/// Normalize an error response body into an [`ErrorPayload`]
///
/// Prefers the body's `message` field, then the raw body text, then the
/// status reason phrase.
fn error_payload(status: u16, body: &str) -> ErrorPayload {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

    match message {
        Some(message) => ErrorPayload::new(status, message),
        None => {
            let payload = ErrorPayload::new(status, "");
            let reason = payload.error.clone();
            ErrorPayload {
                message: reason,
                ..payload
            }
        }
    }
}
