use crate::cloudapi::config::{ClientConfig, Environment};
use crate::validation::error::ValidationError;

/// Validate a client configuration before a client is built from it.
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. `key` must be present and non-empty
/// 2. `log` must be present
/// 3. in the production environment, `token` must be present
///
/// Outside production a missing token is accepted.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), ValidationError> {
    if !config.has_key() {
        tracing::debug!("Client configuration rejected: missing key");
        return Err(ValidationError::missing("key"));
    }

    if config.log.is_none() {
        tracing::debug!("Client configuration rejected: missing log sink");
        return Err(ValidationError::missing("log"));
    }

    if config.environment == Environment::Production && config.token.is_none() {
        tracing::debug!("Client configuration rejected: production requires a token");
        return Err(ValidationError::required_for("token", "production"));
    }

    Ok(())
}
