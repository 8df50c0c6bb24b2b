use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::AUTHORIZATION;
use hyper::Request;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

mod error;
mod http_client;

use crate::configuration::ArtifactoryConfig;
use crate::meta::Checksums;
pub use error::Error;
use http_client::{HttpClient, HttpClientBuilder};

/// One child returned by the storage API for a folder. Entry URIs carry
/// their leading slash, e.g. `/thanos`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub folder: bool,
    pub uri: String,
}

#[derive(Debug, Default, Deserialize)]
struct FolderListing {
    #[serde(default)]
    children: Vec<DirectoryEntry>,
}

/// Storage metadata for a leaf artifact. `path` is relative to `repo`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FileInfo {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub checksums: Checksums,
}

/// Listing and checksum-metadata collaborators of the storage API,
/// keyed by manager-relative path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn list(&self, path: &str) -> Result<Vec<DirectoryEntry>, Error>;

    async fn file_info(&self, path: &str) -> Result<FileInfo, Error>;
}

pub struct Client {
    base_url: String,
    authorization: String,
    query_timeout: Duration,
    http: Box<dyn HttpClient>,
}

impl Client {
    pub fn new(config: &ArtifactoryConfig) -> Result<Self, Error> {
        let http = HttpClientBuilder::new()
            .set_server_ca_bundle(config.server_ca_bundle.clone())
            .set_max_redirect(config.max_redirect)
            .build()?;

        let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {credentials}"),
            query_timeout: Duration::from_secs(config.query_timeout),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_data(&self, path: &str) -> Result<Bytes, String> {
        let uri = format!("{}{path}", self.base_url);
        debug!("GET {uri}");

        let request = Request::get(uri.as_str())
            .header(AUTHORIZATION, &self.authorization)
            .body(Empty::<Bytes>::new())
            .map_err(|err| err.to_string())?;

        let response = tokio::time::timeout(self.query_timeout, self.http.request(request))
            .await
            .map_err(|_| format!("request timed out after {:?}", self.query_timeout))?
            .map_err(|err| err.to_string())?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| err.to_string())?
            .to_bytes();

        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }

        Ok(body)
    }
}

#[async_trait]
impl StorageApi for Client {
    #[instrument(skip(self))]
    async fn list(&self, path: &str) -> Result<Vec<DirectoryEntry>, Error> {
        let body = self.get_data(path).await.map_err(|reason| Error::Listing {
            path: path.to_string(),
            reason,
        })?;

        let listing: FolderListing =
            serde_json::from_slice(&body).map_err(|err| Error::Listing {
                path: path.to_string(),
                reason: err.to_string(),
            })?;

        Ok(listing.children)
    }

    #[instrument(skip(self))]
    async fn file_info(&self, path: &str) -> Result<FileInfo, Error> {
        let body = self
            .get_data(path)
            .await
            .map_err(|reason| Error::Metadata {
                path: path.to_string(),
                reason,
            })?;

        serde_json::from_slice(&body).map_err(|err| Error::Metadata {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }
}
