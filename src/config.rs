//! Configuration from the process environment.
//!
//! `.env` is loaded in main via dotenvy before this runs, so values in
//! that file and real environment variables both land here; the real
//! environment wins.

use std::env;
use std::path::{Path, PathBuf};

/// Tool configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Publish mode indicator: set when the PUBLISH env var is present.
    pub publish: bool,
    /// Version override from the VERSION env var.
    pub version: Option<String>,
    /// Root of the publish tree (default: <base_dir>/publish).
    pub publish_dir: PathBuf,
}

impl Config {
    pub fn load(base_dir: &Path) -> Self {
        let publish = env::var_os("PUBLISH").is_some();
        let version = env::var("VERSION").ok();

        let publish_dir = env::var_os("PUBLISH_DIR")
            .map(|s| {
                let path = PathBuf::from(s);
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .unwrap_or_else(|| base_dir.join("publish"));

        Self {
            publish,
            version,
            publish_dir,
        }
    }

    /// Version to stamp into artifact names and the manifest: the env
    /// var wins over the build context, empty when neither is set.
    pub fn resolve_version(&self, context_version: Option<&str>) -> String {
        self.version
            .as_deref()
            .or(context_version)
            .unwrap_or("")
            .to_string()
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  PUBLISH: {}", if self.publish { "set" } else { "not set" });
        println!(
            "  VERSION: {}",
            self.version.as_deref().unwrap_or("(from build context)")
        );
        println!("  PUBLISH_DIR: {}", self.publish_dir.display());
    }
}
