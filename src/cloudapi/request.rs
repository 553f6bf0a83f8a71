use serde_json::Value;
use std::fmt;

/// HTTP verb used for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Per-call options for [`fetch`](crate::CloudApiClient::fetch)
///
/// Query parameters are serialized in insertion order. A `default` value,
/// when set, is returned in place of an error if the request fails; falsy
/// values such as `""`, `0` or `false` count as set.
///
/// # Example
///
/// ```
/// use cloudapi_sdk::{Method, RequestOptions};
///
/// let options = RequestOptions::new()
///     .method(Method::Post)
///     .query("action", "stop")
///     .default_value(serde_json::Value::Null);
///
/// assert_eq!(options.build_target("machines/abc"), "machines/abc?action=stop");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub include_res: bool,
    pub default: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP verb (builder pattern)
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a query parameter (builder pattern)
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Return the full envelope instead of the bare payload (builder pattern)
    pub fn include_res(mut self, include_res: bool) -> Self {
        self.include_res = include_res;
        self
    }

    /// Set the fallback value returned on failure (builder pattern)
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Build the request target for `path`
    ///
    /// Without query parameters the path is returned unchanged. Otherwise the
    /// url-encoded query string is appended after a `?`. The path itself is
    /// never encoded.
    pub fn build_target(&self, path: &str) -> String {
        if self.query.is_empty() {
            return path.to_string();
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();

        format!("{}?{}", path, query)
    }
}
