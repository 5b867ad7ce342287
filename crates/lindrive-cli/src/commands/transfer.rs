//! Get and Put commands - individual file transfers
//!
//! Both commands record their outcome in the state store when the local
//! file lives inside the configured sync root, exactly the way the
//! Monitor and Poller record completed transfers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use lindrive_core::config::Config;
use lindrive_core::domain::newtypes::{ContentHash, RelativePath, RemoteId};
use lindrive_core::domain::record::RemoteFileRecord;
use lindrive_core::ports::remote_ops::RemoteFileOps;
use lindrive_state::StateStore;

/// Download a remote file
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Remote item ID to download
    pub remote_id: String,
    /// Destination path on the local filesystem
    pub dest: PathBuf,
}

impl GetCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let ops = super::drive_ops(config).await?;
        let remote_id = RemoteId::new(self.remote_id.clone()).context("Invalid remote ID")?;

        ops.download_to(&remote_id, &self.dest).await?;
        let hash = ContentHash::of_file(&self.dest).context("Cannot hash downloaded file")?;
        println!("Downloaded {} -> {}", remote_id, self.dest.display());

        if let Some(relative) = relative_to_root(config, &self.dest) {
            let store = StateStore::open(&config.state_path);
            store.set(
                &relative,
                RemoteFileRecord::new(remote_id.as_str(), hash.as_str()),
            );
            debug!(path = %relative, "Recorded download in state store");
        }
        Ok(())
    }
}

/// Upload a local file
#[derive(Debug, Args)]
pub struct PutCommand {
    /// Source file on the local filesystem
    pub src: PathBuf,
    /// Name on the remote side; defaults to the source file name
    #[arg(long)]
    pub name: Option<String>,
    /// Parent folder ID; omit for the root
    #[arg(long)]
    pub parent: Option<String>,
    /// MIME type hint
    #[arg(long)]
    pub mime_type: Option<String>,
}

impl PutCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let ops = super::drive_ops(config).await?;
        let parent = self
            .parent
            .as_deref()
            .map(RemoteId::new)
            .transpose()
            .context("Invalid parent folder ID")?;
        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .src
                .file_name()
                .and_then(|n| n.to_str())
                .context("Source path has no usable file name")?
                .to_string(),
        };

        let resource = ops
            .upload(&self.src, &name, parent.as_ref(), self.mime_type.as_deref())
            .await?;
        println!("Uploaded {} as {} (id {})", self.src.display(), name, resource.id);

        if let Some(relative) = relative_to_root(config, &self.src) {
            let hash = match &resource.content_hash {
                Some(hash) => hash.clone(),
                None => ContentHash::of_file(&self.src)
                    .context("Cannot hash uploaded file")?
                    .to_string(),
            };
            let store = StateStore::open(&config.state_path);
            store.set(&relative, RemoteFileRecord::new(resource.id.as_str(), hash));
            debug!(path = %relative, "Recorded upload in state store");
        }
        Ok(())
    }
}

/// Maps an absolute or cwd-relative local path to a root-relative path
///
/// Returns `None` when the path lies outside the configured sync root;
/// transfers outside the root are legitimate but not tracked.
fn relative_to_root(config: &Config, path: &Path) -> Option<RelativePath> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };

    let stripped = absolute.strip_prefix(&config.local_root_path).ok()?;
    let joined = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    RelativePath::new(joined).ok()
}
