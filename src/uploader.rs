//! Uploader flag rewriting for single-combined-image builds.
//!
//! Once all flash images are merged into one binary at offset 0x0, the
//! uploader must stop flashing the individual auxiliary images; their
//! flag entries (offset and path alike) are stale and get dropped.

use anyhow::{Context as _, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::context::FlashImage;

/// Filter the uploader flag list for a merged binary.
///
/// Drops every flag equal to an auxiliary image's offset or path, then
/// appends the merged binary at offset 0x0. Only called in merged mode;
/// multi-image publishes leave the per-image flags untouched.
pub fn rewrite_upload_flags(
    flags: &[String],
    extra_images: &[FlashImage],
    merged_bin: &Path,
) -> Vec<String> {
    let stale: HashSet<String> = extra_images
        .iter()
        .flat_map(|image| {
            [
                image.offset.clone(),
                image.path.to_string_lossy().into_owned(),
            ]
        })
        .collect();

    let mut rewritten: Vec<String> = flags
        .iter()
        .filter(|f| !stale.contains(f.as_str()))
        .cloned()
        .collect();

    rewritten.push("0x0".to_string());
    rewritten.push(merged_bin.to_string_lossy().into_owned());
    rewritten
}

/// Write the rewritten flag list, one flag per line, for the build
/// wrapper to consume.
pub fn write_flags_file(path: &Path, flags: &[String]) -> Result<()> {
    let mut content = flags.join("\n");
    content.push('\n');
    fs::write(path, content)
        .with_context(|| format!("Failed to write upload flags {}", path.display()))?;
    Ok(())
}
