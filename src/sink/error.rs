use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Configuration(String),
    Serialization(String),
    Persist(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Error::Serialization(e) => write!(f, "Serialization error: {e}"),
            Error::Persist(e) => write!(f, "Failed to persist index: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persist(err.to_string())
    }
}
