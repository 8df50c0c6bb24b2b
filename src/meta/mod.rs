use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

pub mod path_builder;

/// Content digests as reported by the repository manager. Opaque
/// identifiers, never recomputed or validated against content.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Checksums {
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub sha256: String,
}

/// A leaf object discovered under a repository root.
#[derive(Clone, Debug, PartialEq)]
pub struct Artifact {
    pub path: String,
    pub repo: String,
    pub checksums: Checksums,
}

impl Artifact {
    pub fn new(path: String, repo: &str, checksums: Checksums) -> Self {
        Self {
            path,
            repo: normalize_repo(repo).to_string(),
            checksums,
        }
    }
}

/// Remote-proxy repositories carry a `-cache` suffix in the storage tree;
/// the registry namespace uses the plain name. Strips one occurrence only.
pub fn normalize_repo(repo: &str) -> &str {
    repo.strip_suffix("-cache").unwrap_or(repo)
}

/// Flat mapping from registry-v2 link path to digest value. Last writer
/// wins for a given key. Ordered so the serialized index is deterministic.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegistryIndex(BTreeMap<String, String>);

impl RegistryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, link: String, digest: String) -> Option<String> {
        self.0.insert(link, digest)
    }

    pub fn get(&self, link: &str) -> Option<&String> {
        self.0.get(link)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

pub fn is_manifest(path: &str) -> bool {
    path.ends_with("manifest.json")
}

pub fn is_layer(path: &str) -> bool {
    path.contains("sha256__")
}

/// Derives registry-v2 link entries from discovered artifacts.
///
/// Pure: configured once with the repository-manager URL, never consults
/// the environment.
#[derive(Clone, Debug)]
pub struct LinkGenerator {
    manager_url: String,
}

impl LinkGenerator {
    pub fn new(manager_url: impl Into<String>) -> Self {
        Self {
            manager_url: manager_url.into(),
        }
    }

    /// Fold one artifact into the index. Never fails: a path matching
    /// neither classification emits no entries, as does an artifact
    /// whose manager record carries no sha256.
    pub fn apply(&self, artifact: &Artifact, index: &mut RegistryIndex) {
        // Every link value and the blob fan-out directory are derived
        // from the sha256; the fan-out needs its first two characters.
        if artifact.checksums.sha256.len() < 2 {
            return;
        }
        let path = self.normalize(&artifact.path);
        if is_manifest(path) {
            generate_manifest(path, artifact, index);
        }
        if is_layer(path) {
            generate_layer(path, artifact, index);
        }
    }

    fn normalize<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(&self.manager_url).unwrap_or(path)
    }
}

// /thanos/thanos/v0.31.0/list.manifest.json ->
// .../repositories/<repo>/thanos/thanos/_manifests/tags/v0.31.0/current/link
fn generate_manifest(path: &str, artifact: &Artifact, index: &mut RegistryIndex) {
    let rel = strip_repo_prefix(path, &artifact.repo);
    let parts: Vec<&str> = rel.split('/').collect();
    if parts.len() < 2 {
        return;
    }
    let tag = parts[parts.len() - 2];
    let image = parts[..parts.len() - 2].join("/");
    let namespace = format!("{}{image}", artifact.repo);

    let sha256 = &artifact.checksums.sha256;
    let tag_link = path_builder::tag_link_path(&namespace, tag);
    let revision_link = path_builder::revision_link_path(&tag_link, sha256);

    index.insert(tag_link, sha256.clone());
    index.insert(revision_link, sha256.clone());
    generate_blob(artifact, index);
}

// /thanos/thanos/sha256__c02f.../sha256__05a2... ->
// .../repositories/<repo>/thanos/thanos/_layers/sha256/05a2.../link
fn generate_layer(path: &str, artifact: &Artifact, index: &mut RegistryIndex) {
    let rel = strip_repo_prefix(path, &artifact.repo);
    let image = match rel.find("/sha256__") {
        Some(idx) => &rel[..idx],
        None => rel,
    };
    let namespace = format!("{}{image}", artifact.repo);

    let sha256 = &artifact.checksums.sha256;
    index.insert(
        path_builder::layer_link_path(&namespace, sha256),
        sha256.clone(),
    );
    generate_blob(artifact, index);
}

fn generate_blob(artifact: &Artifact, index: &mut RegistryIndex) {
    index.insert(
        path_builder::blob_data_path(&artifact.checksums.sha256),
        artifact.checksums.sha1.clone(),
    );
}

/// Some storage layouts embed the repository as the leading path segments;
/// consume it so the namespace is not qualified twice.
fn strip_repo_prefix<'a>(path: &'a str, repo: &str) -> &'a str {
    if repo.is_empty() {
        return path;
    }
    match path
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(repo))
    {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
