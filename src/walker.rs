use crate::artifactory::{Error, StorageApi};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, instrument};

/// Depth-first enumeration of every leaf artifact path under `root`,
/// children in listing order. A listing failure at any node aborts the
/// whole walk for this root.
#[instrument(skip(api))]
pub async fn walk(api: &dyn StorageApi, root: &str) -> Result<Vec<String>, Error> {
    let mut leaves = Vec::new();
    walk_into(api, root.to_string(), &mut leaves).await?;
    debug!("Found {} leaf artifact(s) under {root}", leaves.len());
    Ok(leaves)
}

fn walk_into<'a>(
    api: &'a dyn StorageApi,
    path: String,
    leaves: &'a mut Vec<String>,
) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
    Box::pin(async move {
        for entry in api.list(&path).await? {
            let child = format!("{path}{}", entry.uri);
            if entry.folder {
                walk_into(api, child, leaves).await?;
            } else {
                leaves.push(child);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifactory::{DirectoryEntry, MockStorageApi};

    fn folder(uri: &str) -> DirectoryEntry {
        DirectoryEntry {
            folder: true,
            uri: uri.to_string(),
        }
    }

    fn file(uri: &str) -> DirectoryEntry {
        DirectoryEntry {
            folder: false,
            uri: uri.to_string(),
        }
    }

    #[tokio::test]
    async fn test_walk_collects_nested_leaves() {
        let mut api = MockStorageApi::new();
        api.expect_list()
            .withf(|path| path == "/quay-io")
            .returning(|_| Ok(vec![folder("/thanos"), file("/repository.catalog")]));
        api.expect_list()
            .withf(|path| path == "/quay-io/thanos")
            .returning(|_| Ok(vec![folder("/thanos")]));
        api.expect_list()
            .withf(|path| path == "/quay-io/thanos/thanos")
            .returning(|_| Ok(vec![folder("/v0.31.0"), folder("/empty")]));
        api.expect_list()
            .withf(|path| path == "/quay-io/thanos/thanos/v0.31.0")
            .returning(|_| Ok(vec![file("/list.manifest.json")]));
        api.expect_list()
            .withf(|path| path == "/quay-io/thanos/thanos/empty")
            .returning(|_| Ok(vec![]));

        let leaves = walk(&api, "/quay-io").await.unwrap();

        assert_eq!(
            leaves,
            vec![
                "/quay-io/thanos/thanos/v0.31.0/list.manifest.json".to_string(),
                "/quay-io/repository.catalog".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_walk_empty_root() {
        let mut api = MockStorageApi::new();
        api.expect_list()
            .withf(|path| path == "/empty-repo")
            .returning(|_| Ok(vec![]));

        let leaves = walk(&api, "/empty-repo").await.unwrap();
        assert!(leaves.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_aborts_the_root() {
        let mut api = MockStorageApi::new();
        api.expect_list()
            .withf(|path| path == "/quay-io")
            .returning(|_| Ok(vec![file("/early.manifest.json"), folder("/broken")]));
        api.expect_list()
            .withf(|path| path == "/quay-io/broken")
            .returning(|_| {
                Err(Error::Listing {
                    path: "/quay-io/broken".to_string(),
                    reason: "unexpected status 500 Internal Server Error".to_string(),
                })
            });

        let err = walk(&api, "/quay-io").await.unwrap_err();
        match err {
            Error::Listing { path, .. } => assert_eq!(path, "/quay-io/broken"),
            other => panic!("Expected listing error, got {other:?}"),
        }
    }
}
