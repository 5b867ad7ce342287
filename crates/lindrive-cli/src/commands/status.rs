//! Status command - Display the tracked sync state
//!
//! Shows the full state mapping (or one entry when a path is given):
//! which local relative paths are tracked, and the remote ID and content
//! MD5 recorded for each at last sync.

use anyhow::{Context, Result};
use clap::Args;

use lindrive_core::config::Config;
use lindrive_core::domain::newtypes::RelativePath;
use lindrive_state::StateStore;

/// Show the tracked sync state
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Optional relative path to show one entry
    pub path: Option<String>,
}

impl StatusCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let store = StateStore::open(&config.state_path);

        if let Some(path) = &self.path {
            let path = RelativePath::new(path.clone()).context("Invalid relative path")?;
            match store.get(&path) {
                Some(record) => {
                    println!("{path}");
                    println!("  remote id: {}", record.id);
                    println!("  md5:       {}", record.md5);
                }
                None => println!("{path}: not tracked"),
            }
            return Ok(());
        }

        let snapshot = store.snapshot();
        if snapshot.is_empty() {
            println!("No tracked files ({}).", config.state_path.display());
            return Ok(());
        }

        println!(
            "{} tracked file(s) in {}",
            snapshot.len(),
            config.state_path.display()
        );
        let mut entries: Vec<_> = snapshot.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (path, record) in entries {
            println!("  {path}  id={}  md5={}", record.id, record.md5);
        }
        Ok(())
    }
}
