//! Link-path formatting for the registry-v2 on-disk layout.
//!
//! Paths produced here must stay byte-exact: the downstream registry
//! resolves tags and blobs by opening these files verbatim.

pub const DOCKER_BASE_URL: &str = "/docker/registry/v2";

pub fn tag_link_path(namespace: &str, tag: &str) -> String {
    format!("{DOCKER_BASE_URL}/repositories/{namespace}/_manifests/tags/{tag}/current/link")
}

pub fn layer_link_path(namespace: &str, sha256: &str) -> String {
    format!("{DOCKER_BASE_URL}/repositories/{namespace}/_layers/sha256/{sha256}/link")
}

/// Blob-data path with the two-hex-character fan-out directory, e.g.
/// `/docker/registry/v2/blobs/sha256/e7/e7d3...a7e/data`.
pub fn blob_data_path(sha256: &str) -> String {
    format!(
        "{DOCKER_BASE_URL}/blobs/sha256/{}/{}/data",
        &sha256[0..2],
        sha256
    )
}

/// Derive the revision link from a tag link by replacing everything from
/// the first `/tags` occurrence onward. First-occurrence substring match,
/// case sensitive.
pub fn revision_link_path(tag_link: &str, sha256: &str) -> String {
    match tag_link.find("/tags") {
        Some(idx) => format!("{}/revisions/sha256/{sha256}/link", &tag_link[..idx]),
        None => tag_link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_link_path() {
        assert_eq!(
            tag_link_path("thanos/thanos", "v0.31.0"),
            "/docker/registry/v2/repositories/thanos/thanos/_manifests/tags/v0.31.0/current/link"
        );
    }

    #[test]
    fn test_layer_link_path() {
        assert_eq!(
            layer_link_path("ns", "digest123"),
            "/docker/registry/v2/repositories/ns/_layers/sha256/digest123/link"
        );
    }

    #[test]
    fn test_blob_data_path() {
        assert_eq!(
            blob_data_path("044c3ca8c12c47635ecf137e6132ea615b4a65b5d540a3796332ac00724c2541"),
            "/docker/registry/v2/blobs/sha256/04/044c3ca8c12c47635ecf137e6132ea615b4a65b5d540a3796332ac00724c2541/data"
        );
    }

    #[test]
    fn test_revision_link_path() {
        let tag_link = tag_link_path("bks-docker-local/cert-manager-controller", "v0.12.0-venafi");
        assert_eq!(
            revision_link_path(
                &tag_link,
                "044c3ca8c12c47635ecf137e6132ea615b4a65b5d540a3796332ac00724c2541"
            ),
            "/docker/registry/v2/repositories/bks-docker-local/cert-manager-controller/_manifests/revisions/sha256/044c3ca8c12c47635ecf137e6132ea615b4a65b5d540a3796332ac00724c2541/link"
        );
    }

    #[test]
    fn test_revision_link_replaces_from_first_tags_occurrence() {
        let tag_link = tag_link_path("ns/tags-mirror", "v1");
        assert_eq!(
            revision_link_path(&tag_link, "abc"),
            "/docker/registry/v2/repositories/ns/revisions/sha256/abc/link"
        );
    }
}
