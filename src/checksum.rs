//! Checksum sidecar for published binaries.
//!
//! Flashing tools and release scripts verify downloads against a
//! `.sha256` file in sha256sum format next to the binary.

use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Compute the SHA256 hex digest of a file.
pub fn hash_file(path: &Path) -> Result<String> {
    let content = fs::read(path)
        .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write `<file>.sha256` next to a published binary.
///
/// Content is a single sha256sum-compatible line: digest, two spaces,
/// basename.
pub fn write_checksum(bin: &Path) -> Result<PathBuf> {
    let digest = hash_file(bin)?;
    let name = bin
        .file_name()
        .with_context(|| format!("Binary path has no filename: {}", bin.display()))?
        .to_string_lossy();

    let checksum_path = bin.with_file_name(format!("{}.sha256", name));
    fs::write(&checksum_path, format!("{}  {}\n", digest, name))
        .with_context(|| format!("Failed to write checksum {}", checksum_path.display()))?;
    Ok(checksum_path)
}
