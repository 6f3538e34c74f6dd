//! CLI error types.

use docnav_config::ConfigError;
use docnav_nav::ResolveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize navigation: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message_is_passed_through() {
        let err = CliError::from(ConfigError::Validation("docs.root is bad".to_owned()));
        assert_eq!(err.to_string(), "Configuration error: docs.root is bad");
    }

    #[test]
    fn test_resolve_error_message_is_passed_through() {
        let err = CliError::from(ResolveError::InvalidExtensions("'md' is listed more than once".to_owned()));
        assert_eq!(
            err.to_string(),
            "Invalid content extensions: 'md' is listed more than once"
        );
    }
}
