use thiserror::Error;

/// Message returned when a provider failure carries no description of its own.
pub const GENERATION_FALLBACK: &str = "Failed to generate image";

#[derive(Debug, Error)]
pub enum SkygenError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The prediction service answered, but not with something usable.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkygenError {
    pub fn detail(&self) -> String {
        match self {
            SkygenError::Validation(msg)
            | SkygenError::Transport(msg)
            | SkygenError::Config(msg)
            | SkygenError::Serialization(msg) => msg.clone(),
            SkygenError::Upstream { message, .. } => message.clone(),
            SkygenError::Io(e) => e.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        let message = self.detail();
        if message.trim().is_empty() {
            GENERATION_FALLBACK.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for SkygenError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SkygenError::Upstream {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None if e.is_decode() => SkygenError::Serialization(e.to_string()),
            None => SkygenError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for SkygenError {
    fn from(e: serde_json::Error) -> Self {
        SkygenError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SkygenError>;
