//! Clean command - removes published artifacts.

use anyhow::Result;
use std::fs;

use crate::config::Config;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Remove the whole publish tree
    All,
    /// Remove one environment's publish subdirectory
    Env(String),
}

/// Execute the clean command.
pub fn cmd_clean(config: &Config, target: CleanTarget) -> Result<()> {
    match target {
        CleanTarget::All => {
            if config.publish_dir.exists() {
                println!("Removing {}...", config.publish_dir.display());
                fs::remove_dir_all(&config.publish_dir)?;
                println!("Publish tree cleaned.");
            } else {
                println!("No published artifacts to clean.");
            }
        }
        CleanTarget::Env(env_name) => {
            let env_dir = config.publish_dir.join(&env_name);
            if env_dir.exists() {
                println!("Removing {}...", env_dir.display());
                fs::remove_dir_all(&env_dir)?;
                println!("Environment '{}' cleaned.", env_name);
            } else {
                println!("No published artifacts for '{}'.", env_name);
            }
        }
    }
    Ok(())
}
