//! Build context - snapshot of build-tool state for one environment.
//!
//! The build system's post-build hook dumps its state to a small JSON
//! file; everything downstream works from this immutable value instead
//! of reaching back into the build tool.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A compile-time defined symbol: either a bare name or a name/value pair.
///
/// Mirrors the build tool's define list, where `PUBLISH` appears bare and
/// `CHIP_FAMILY` carries a value. Names are not necessarily unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Define {
    Valued(String, String),
    Bare(String),
}

impl Define {
    pub fn name(&self) -> &str {
        match self {
            Define::Bare(name) => name,
            Define::Valued(name, _) => name,
        }
    }
}

/// An auxiliary flash image and the offset it is flashed at.
///
/// The offset stays an opaque hex string until manifest-write time;
/// sequence order determines manifest and merge-argument order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashImage {
    pub offset: String,
    pub path: PathBuf,
}

impl FlashImage {
    pub fn new(offset: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            offset: offset.into(),
            path: path.into(),
        }
    }
}

/// Read-only snapshot of the build environment, written by the build
/// hook and consumed by the publish/export pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildContext {
    /// Build environment name (e.g. "esp32dev").
    pub env_name: String,
    /// Target version string. The VERSION process env var wins over this.
    #[serde(default)]
    pub version: Option<String>,
    /// Build output directory containing the compiled binary.
    pub build_dir: PathBuf,
    /// Program name; the primary binary is `<build_dir>/<prog_name>.bin`.
    pub prog_name: String,
    /// Ordered compile-time define list.
    #[serde(default)]
    pub defines: Vec<Define>,
    /// Chip identifier for the merge tool (board config `build.mcu`).
    #[serde(default)]
    pub board_mcu: Option<String>,
    /// Auxiliary flash images in flash order.
    #[serde(default)]
    pub flash_images: Vec<FlashImage>,
    /// Flash offset of the application image.
    #[serde(default)]
    pub app_offset: Option<String>,
    /// Uploader flag list (export variant input).
    #[serde(default)]
    pub upload_flags: Vec<String>,
    /// Display name override for the web flasher manifest.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl BuildContext {
    /// Load a build context from a JSON file written by the build hook.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read build context {}", path.display()))?;
        let ctx: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid build context {}", path.display()))?;
        Ok(ctx)
    }

    /// Value of a named define.
    ///
    /// First matching entry wins. A name/value pair yields its value, a
    /// bare entry yields the empty string. Absence is a normal outcome,
    /// not an error.
    pub fn define_value(&self, name: &str) -> Option<&str> {
        self.defines.iter().find(|d| d.name() == name).map(|d| match d {
            Define::Bare(_) => "",
            Define::Valued(_, value) => value.as_str(),
        })
    }

    /// True if the named symbol is defined at all (bare or valued).
    pub fn is_defined(&self, name: &str) -> bool {
        self.define_value(name).is_some()
    }

    /// Path of the compiled application binary.
    pub fn app_bin(&self) -> PathBuf {
        self.build_dir.join(format!("{}.bin", self.prog_name))
    }

    /// Application flash offset, defaulting like the build tool does.
    pub fn app_offset(&self) -> &str {
        self.app_offset.as_deref().unwrap_or("0x00")
    }

    /// Chip identifier for esptool, defaulting to plain esp32.
    pub fn mcu(&self) -> &str {
        self.board_mcu.as_deref().unwrap_or("esp32")
    }
}
