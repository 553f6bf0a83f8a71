use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Response metadata returned alongside a payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// HTTP status code
    pub status: u16,
    /// Response headers in the order they were received
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl ResponseMeta {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw transport result: the response body and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: Value,
    pub res: ResponseMeta,
}

/// Result of a [`fetch`](crate::CloudApiClient::fetch) call
///
/// `Payload` holds the bare response body (or a fallback default);
/// `Envelope` is returned when `include_res` was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Payload(Value),
    Envelope(Envelope),
}

impl FetchResult {
    /// The payload, whichever shape the result has
    pub fn payload(&self) -> &Value {
        match self {
            FetchResult::Payload(payload) => payload,
            FetchResult::Envelope(envelope) => &envelope.payload,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            FetchResult::Payload(payload) => payload,
            FetchResult::Envelope(envelope) => envelope.payload,
        }
    }

    /// The full envelope, if one was requested
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            FetchResult::Envelope(envelope) => Some(envelope),
            FetchResult::Payload(_) => None,
        }
    }

    /// Decode the payload into a typed value
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        serde_json::from_value(self.into_payload())
            .map_err(|e| FetchError::Parse(format!("Failed to decode payload: {}", e)))
    }
}

/// Normalized body of a remote API error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// HTTP status code
    pub status_code: u16,
    /// Canonical reason phrase for the status (e.g. "Not Found")
    pub error: String,
    /// Human-readable message from the API
    pub message: String,
}

impl ErrorPayload {
    /// Build a payload, deriving `error` from the status code
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        let error = reqwest::StatusCode::from_u16(status_code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Error")
            .to_string();

        Self {
            status_code,
            error,
            message: message.into(),
        }
    }
}

/// Errors returned by a failed request
///
/// Only `Api` carries a structured [`ErrorPayload`]; the other variants are
/// plain errors raised before a response was received or while reading it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The remote API answered with a non-success status
    Api(ErrorPayload),
    /// Network error (connection, timeout, etc.)
    Network(String),
    /// Failed to parse response
    Parse(String),
    /// The request could not be signed
    Signing(String),
}

impl FetchError {
    /// Whether this error carries a structured API payload
    pub fn is_structured(&self) -> bool {
        matches!(self, FetchError::Api(_))
    }

    /// The structured API payload, if any
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            FetchError::Api(payload) => Some(payload),
            _ => None,
        }
    }

    /// HTTP status code, for structured API errors
    pub fn status_code(&self) -> Option<u16> {
        self.payload().map(|payload| payload.status_code)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Api(payload) => write!(
                f,
                "HTTP {} {}: {}",
                payload.status_code, payload.error, payload.message
            ),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::Signing(msg) => write!(f, "Signing error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            FetchError::Network(format!("Connection failed: {}", err))
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<jsonwebtoken::errors::Error> for FetchError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        FetchError::Signing(err.to_string())
    }
}
