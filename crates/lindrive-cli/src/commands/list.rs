//! List command - List the children of a remote folder

use anyhow::{Context, Result};
use clap::Args;

use lindrive_core::config::Config;
use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::RemoteFileOps;

/// List the children of a remote folder
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Folder to list; omit for the root scope
    #[arg(long)]
    pub folder_id: Option<String>,
}

impl ListCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let ops = super::drive_ops(config).await?;
        let folder_id = self
            .folder_id
            .as_deref()
            .map(RemoteId::new)
            .transpose()
            .context("Invalid folder ID")?;

        let mut items = ops.list_children(folder_id.as_ref()).await?;
        items.sort_by(|a, b| a.name.cmp(&b.name));

        for item in &items {
            let kind = if item.is_folder() { "d" } else { "-" };
            let hash = item.content_hash.as_deref().unwrap_or("-");
            println!("{kind} {:<44} {:<34} {hash}", item.id, item.name);
        }
        println!("{} item(s)", items.len());
        Ok(())
    }
}
