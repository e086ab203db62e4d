//! Error types for the quiz relay.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The messaging API answered with a non-success status.
    #[error("{name} API error: {}", describe_api_failure(.status, .description))]
    Api {
        name: String,
        status: u16,
        description: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response from {name}: {reason}")]
    InvalidResponse { name: String, reason: String },
}

fn describe_api_failure(status: &u16, description: &Option<String>) -> String {
    match description {
        Some(desc) if !desc.trim().is_empty() => desc.to_string(),
        _ => status.to_string(),
    }
}
