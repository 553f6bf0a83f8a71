//! Failure logging for CloudAPI requests.
//!
//! Every failed `fetch` hands exactly one [`LogRecord`] to the configured
//! [`LogSink`]. Successful calls never reach the sink.

use crate::cloudapi::types::FetchError;
use serde::{Deserialize, Serialize};

/// A single failed-request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// The request target that failed (path plus query string)
    pub parts: String,
    /// Details of the error
    pub data: LogData,
}

/// Error details carried by a [`LogRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    /// The error message
    pub message: String,
    /// HTTP status code, for structured API errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Error name, for structured API errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogRecord {
    pub(crate) fn from_error(parts: &str, error: &FetchError) -> Self {
        let data = match error.payload() {
            Some(payload) => LogData {
                message: payload.message.clone(),
                status_code: Some(payload.status_code),
                error: Some(payload.error.clone()),
            },
            None => LogData {
                message: error.to_string(),
                status_code: None,
                error: None,
            },
        };

        Self {
            parts: parts.to_string(),
            data,
        }
    }
}

/// Destination for failed-request records
///
/// Implemented for any `Fn(&LogRecord)` closure, so a sink can be passed as
/// a plain function.
pub trait LogSink: Send + Sync {
    fn log(&self, record: &LogRecord);
}

impl<F> LogSink for F
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn log(&self, record: &LogRecord) {
        self(record)
    }
}

/// Log sink that forwards records to `tracing` at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, record: &LogRecord) {
        tracing::error!(
            parts = %record.parts,
            status_code = ?record.data.status_code,
            error = ?record.data.error,
            "CloudAPI request failed: {}",
            record.data.message
        );
    }
}
