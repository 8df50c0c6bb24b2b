use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Configuration(String),
    Http(String),
    Listing { path: String, reason: String },
    Metadata { path: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Error::Http(msg) => write!(f, "HTTP error: {msg}"),
            Error::Listing { path, reason } => {
                write!(f, "Failed to list '{path}': {reason}")
            }
            Error::Metadata { path, reason } => {
                write!(f, "Failed to fetch checksums for '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<rustls_pki_types::pem::Error> for Error {
    fn from(err: rustls_pki_types::pem::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}
