use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::meta::RegistryIndex;
use crate::sink::{Error, Sink};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BackendConfig {
    pub path: String,
}

pub struct Backend {
    path: String,
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            path: config.path.clone(),
        }
    }
}

#[async_trait]
impl Sink for Backend {
    #[instrument(skip(self, index))]
    async fn persist(&self, index: &RegistryIndex) -> Result<(), Error> {
        let data = index.to_json()?;
        tokio::fs::write(&self.path, data).await?;
        info!("Wrote {} index entries to {}", index.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_writes_flat_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let backend = Backend::new(&BackendConfig {
            path: path.to_string_lossy().to_string(),
        });

        let mut index = RegistryIndex::new();
        index.insert(
            "/docker/registry/v2/repositories/thanos/thanos/_manifests/tags/v0.31.0/current/link"
                .to_string(),
            "e7d337d6ac2aea3f0f9314ec9830291789e16e2b480b9d353be02d05ce7f2a7e".to_string(),
        );

        backend.persist(&index).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            r#"{"/docker/registry/v2/repositories/thanos/thanos/_manifests/tags/v0.31.0/current/link":"e7d337d6ac2aea3f0f9314ec9830291789e16e2b480b9d353be02d05ce7f2a7e"}"#
        );
    }

    #[tokio::test]
    async fn test_persist_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let backend = Backend::new(&BackendConfig {
            path: path.to_string_lossy().to_string(),
        });

        backend.persist(&RegistryIndex::new()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_persist_fails_on_missing_directory() {
        let backend = Backend::new(&BackendConfig {
            path: "/nonexistent-dir/index.json".to_string(),
        });

        let err = backend.persist(&RegistryIndex::new()).await.unwrap_err();
        assert!(matches!(err, Error::Persist(_)));
    }
}
