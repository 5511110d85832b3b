use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    #[error("Account lists do not line up: {emails} email(s) but {passwords} password(s)")]
    AccountMismatch { emails: usize, passwords: usize },

    #[error("Invalid account entry: {0}")]
    InvalidAccount(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("{service} API error: {message}")]
    Api { service: String, message: String },

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("Notification failed ({channel}): {message}")]
    Notify { channel: String, message: String },

    #[error("Invalid header: {0}")]
    Header(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn api(service: &str, message: impl Into<String>) -> Self {
        AppError::Api {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn notify(channel: &str, message: impl Into<String>) -> Self {
        AppError::Notify {
            channel: channel.to_string(),
            message: message.into(),
        }
    }
}
