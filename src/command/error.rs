use crate::{artifactory, configuration, sink};
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Configuration(configuration::Error),
    Artifactory(artifactory::Error),
    Sink(sink::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(err) => {
                write!(f, "Configuration error:")?;
                write!(f, "{err}")
            }
            Error::Artifactory(err) => {
                write!(f, "Artifactory error: {err}")
            }
            Error::Sink(err) => {
                write!(f, "Sink error: {err}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<configuration::Error> for Error {
    fn from(err: configuration::Error) -> Self {
        Error::Configuration(err)
    }
}

impl From<artifactory::Error> for Error {
    fn from(err: artifactory::Error) -> Self {
        Error::Artifactory(err)
    }
}

impl From<sink::Error> for Error {
    fn from(err: sink::Error) -> Self {
        Error::Sink(err)
    }
}
