use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{timeout::TimeoutConfig, BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client as S3Client, Config as S3Config};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::meta::RegistryIndex;
use crate::sink::{Error, Sink};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub access_key_id: String,
    pub secret_key: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    /// Object key the serialized index is written to.
    pub key: String,
    pub operation_timeout_secs: u64,
    pub operation_attempt_timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_key: String::new(),
            endpoint: String::new(),
            bucket: String::new(),
            region: String::new(),
            key: String::new(),
            operation_timeout_secs: 900,
            operation_attempt_timeout_secs: 300,
            max_attempts: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Backend {
    s3_client: S3Client,
    bucket: String,
    key: String,
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Result<Self, Error> {
        if config.bucket.is_empty() || config.key.is_empty() {
            return Err(Error::Configuration(
                "S3 sink requires a bucket and an object key".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_key,
            None,
            None,
            "custom",
        );

        let timeout = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.operation_timeout_secs))
            .operation_attempt_timeout(Duration::from_secs(config.operation_attempt_timeout_secs))
            .build();

        let retry = RetryConfig::standard().with_max_attempts(config.max_attempts);

        let client_config = S3Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .timeout_config(timeout)
            .retry_config(retry)
            .force_path_style(true)
            .build();

        let s3_client = S3Client::from_conf(client_config);

        Ok(Self {
            s3_client,
            bucket: config.bucket.clone(),
            key: config.key.clone(),
        })
    }
}

#[async_trait]
impl Sink for Backend {
    #[instrument(skip(self, index))]
    async fn persist(&self, index: &RegistryIndex) -> Result<(), Error> {
        let data = index.to_json()?;

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(ByteStream::from(data))
            .content_type("application/json")
            .send()
            .await
            .map_err(|err| Error::Persist(err.to_string()))?;

        info!(
            "Wrote {} index entries to s3://{}/{}",
            index.len(),
            self.bucket,
            self.key
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_requires_bucket_and_key() {
        let err = Backend::new(&BackendConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = Backend::new(&BackendConfig {
            bucket: "registry-meta".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_backend_construction() {
        let backend = Backend::new(&BackendConfig {
            access_key_id: "test-key".to_string(),
            secret_key: "test-secret".to_string(),
            endpoint: "http://localhost:9000".to_string(),
            bucket: "registry-meta".to_string(),
            region: "eu-west-1".to_string(),
            key: "meta/index.json".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(backend.bucket, "registry-meta");
        assert_eq!(backend.key, "meta/index.json");
    }
}
