//! Mkdir and Info commands - remote folder creation and metadata

use anyhow::{Context, Result};
use clap::Args;

use lindrive_core::config::Config;
use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::RemoteFileOps;

/// Create a remote folder
///
/// Creation is not idempotent on the Drive side, so an existing folder
/// with the same name is reported instead of silently duplicated.
#[derive(Debug, Args)]
pub struct MkdirCommand {
    /// Folder name
    pub name: String,
    /// Parent folder ID; omit for the root
    #[arg(long)]
    pub parent: Option<String>,
    /// Create even if a folder with this name already exists
    #[arg(long)]
    pub allow_duplicate: bool,
}

impl MkdirCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let ops = super::drive_ops(config).await?;
        let parent = self
            .parent
            .as_deref()
            .map(RemoteId::new)
            .transpose()
            .context("Invalid parent folder ID")?;

        if !self.allow_duplicate {
            // list-before-create: the API offers no uniqueness guarantee.
            let siblings = ops.list_children(parent.as_ref()).await?;
            if let Some(existing) = siblings
                .iter()
                .find(|r| r.is_folder() && r.name == self.name)
            {
                println!(
                    "Folder '{}' already exists (id {}); pass --allow-duplicate to create anyway",
                    self.name, existing.id
                );
                return Ok(());
            }
        }

        let id = ops.create_folder(&self.name, parent.as_ref()).await?;
        println!("Created folder '{}' (id {id})", self.name);
        Ok(())
    }
}

/// Show metadata for a remote item
#[derive(Debug, Args)]
pub struct InfoCommand {
    /// Remote item ID
    pub remote_id: String,
}

impl InfoCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let ops = super::drive_ops(config).await?;
        let remote_id = RemoteId::new(self.remote_id.clone()).context("Invalid remote ID")?;

        let resource = ops.get_metadata(&remote_id).await?;
        println!("id:        {}", resource.id);
        println!("name:      {}", resource.name);
        println!("mime type: {}", resource.mime_type);
        println!(
            "md5:       {}",
            resource.content_hash.as_deref().unwrap_or("-")
        );
        for parent in &resource.parents {
            println!("parent:    {parent}");
        }
        Ok(())
    }
}
