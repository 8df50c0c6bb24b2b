use serde::Deserialize;
use std::fs;
use std::path::Path;

mod error;

use crate::sink;
pub use error::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct Configuration {
    pub artifactory: ArtifactoryConfig,
    pub sink: SinkConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ArtifactoryConfig {
    /// Base URL of the repository-manager storage API, e.g.
    /// `https://example.jfrog.io/artifactory/api/storage`
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Repository roots to mirror, e.g. `["/quay-io", "/ghcr-io"]`
    pub repositories: Vec<String>,
    #[serde(default = "ArtifactoryConfig::default_query_timeout")]
    pub query_timeout: u64,
    #[serde(default = "ArtifactoryConfig::default_max_redirect")]
    pub max_redirect: u8,
    pub server_ca_bundle: Option<String>,
}

impl ArtifactoryConfig {
    fn default_query_timeout() -> u64 {
        30
    }

    fn default_max_redirect() -> u8 {
        5
    }
}

#[derive(Clone, Debug, Deserialize)]
pub enum SinkConfig {
    #[serde(rename = "fs")]
    FS(sink::fs::BackendConfig),
    #[serde(rename = "s3")]
    S3(sink::s3::BackendConfig),
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config: Configuration = toml::from_str(slice).map_err(|e| {
            println!("Configuration file format error:");
            println!("{e}");
            Error::ConfigurationFileFormat(e.to_string())
        })?;

        if config.artifactory.url.is_empty() {
            return Err(Error::Validation(
                "artifactory.url cannot be empty".to_string(),
            ));
        }
        if config.artifactory.username.is_empty() {
            return Err(Error::Validation(
                "artifactory.username cannot be empty".to_string(),
            ));
        }
        if config.artifactory.repositories.is_empty() {
            return Err(Error::Validation(
                "artifactory.repositories cannot be empty".to_string(),
            ));
        }

        Ok(config)
    }
}
