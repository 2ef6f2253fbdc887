#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Failed to read rule set: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rule set: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for ScanError {
    fn from(e: serde_yaml::Error) -> Self {
        ScanError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
