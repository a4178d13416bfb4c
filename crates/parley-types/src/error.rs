use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required environment variable: {0}")]
    MissingSecret(String),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Errors from sending a reply back through the messaging channel.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("channel rejected reply (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}
