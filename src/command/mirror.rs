use tracing::{info, instrument};

use crate::artifactory::{self, FileInfo, StorageApi};
use crate::command::Error;
use crate::configuration::Configuration;
use crate::meta::{Artifact, LinkGenerator, RegistryIndex};
use crate::sink::{self, Sink};
use crate::walker;

/// One mirror run: walk every configured repository root, resolve
/// checksum metadata for each leaf, synthesize the registry-v2 link
/// index and persist it.
pub struct Command {
    api: Box<dyn StorageApi>,
    generator: LinkGenerator,
    sink: Box<dyn Sink>,
    repositories: Vec<String>,
}

impl Command {
    pub fn new(config: &Configuration) -> Result<Self, Error> {
        let client = artifactory::Client::new(&config.artifactory)?;
        let generator = LinkGenerator::new(client.base_url());
        let sink = sink::build_sink(&config.sink)?;

        Ok(Self {
            api: Box::new(client),
            generator,
            sink,
            repositories: config.artifactory.repositories.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), Error> {
        let mut index = RegistryIndex::new();

        for root in &self.repositories {
            let leaves = walker::walk(self.api.as_ref(), root).await?;
            info!("Discovered {} artifact(s) under {root}", leaves.len());

            for leaf in leaves {
                let file_info = self.api.file_info(&leaf).await?;
                let artifact = resolve_artifact(root, leaf, file_info);
                self.generator.apply(&artifact, &mut index);
            }
        }

        info!("Synthesized {} link entries", index.len());
        self.sink.persist(&index).await?;
        Ok(())
    }
}

/// The storage API reports the repository key and repository-relative
/// path alongside the checksums; fall back to the walked path when a
/// manager omits them.
fn resolve_artifact(root: &str, leaf: String, file_info: FileInfo) -> Artifact {
    let repo = if file_info.repo.is_empty() {
        root.trim_start_matches('/')
    } else {
        file_info.repo.as_str()
    };
    let path = if file_info.path.is_empty() {
        leaf
    } else {
        file_info.path.clone()
    };
    Artifact::new(path, repo, file_info.checksums)
}
