use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarjetasError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Remote service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("TarjetasError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TarjetasError {
    fn from(error: std::io::Error) -> Self {
        TarjetasError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for TarjetasError {
    fn from(error: reqwest::Error) -> Self {
        TarjetasError::Reqwest(Box::new(error))
    }
}
