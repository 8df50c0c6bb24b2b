mod error;
pub mod fs;
pub mod s3;

use async_trait::async_trait;
use tracing::info;

use crate::configuration::SinkConfig;
use crate::meta::RegistryIndex;
pub use error::Error;

/// Destination for the completed, serialized index.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn persist(&self, index: &RegistryIndex) -> Result<(), Error>;
}

pub fn build_sink(config: &SinkConfig) -> Result<Box<dyn Sink>, Error> {
    match config {
        SinkConfig::FS(config) => {
            info!("Using filesystem sink");
            Ok(Box::new(fs::Backend::new(config)))
        }
        SinkConfig::S3(config) => {
            info!("Using S3 sink");
            Ok(Box::new(s3::Backend::new(config)?))
        }
    }
}
