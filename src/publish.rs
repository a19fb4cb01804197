//! Multi-image publish pipeline.
//!
//! Copies the application binary and every auxiliary flash image into
//! `publish/<env>/` under canonical names and writes the web flasher
//! manifest. Runs once per build, after compilation succeeds.

use anyhow::{bail, Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum;
use crate::config::Config;
use crate::context::{BuildContext, FlashImage};
use crate::manifest::WebManifest;

/// Product name prefix for published binaries, kept verbatim.
pub const PRODUCT_NAME: &str = "ATEM_tally_light";
/// Manifest display name when the firmware is built as a test server.
pub const TEST_SERVER_NAME: &str = "ATEM_tally_test_server";

/// Canonical published binary name: `ATEM_tally_light_<version>_<env>.bin`.
pub fn published_bin_name(version: &str, env_name: &str) -> String {
    format!("{}_{}_{}.bin", PRODUCT_NAME, version, env_name)
}

/// Ensure the two-level publish tree exists.
///
/// Safe to call repeatedly and tolerant of another process having
/// created the directories already; never truncates existing contents.
pub fn provision_publish_dir(publish_dir: &Path, env_dir: &Path) -> Result<()> {
    fs::create_dir_all(publish_dir)
        .with_context(|| format!("Failed to create {}", publish_dir.display()))?;
    fs::create_dir_all(env_dir)
        .with_context(|| format!("Failed to create {}", env_dir.display()))?;
    Ok(())
}

/// Manifest display name: explicit override, then the test-server
/// define, then the product name.
pub fn manifest_name(ctx: &BuildContext) -> &str {
    if let Some(name) = ctx.display_name.as_deref() {
        return name;
    }
    if ctx.is_defined("TALLY_TEST_SERVER") {
        TEST_SERVER_NAME
    } else {
        PRODUCT_NAME
    }
}

/// Run the publish pipeline for one build environment.
///
/// Gated on the PUBLISH environment variable: when unset this performs
/// no filesystem action at all.
pub fn run_publish(config: &Config, ctx: &BuildContext) -> Result<()> {
    if !config.publish {
        println!("[SKIP] PUBLISH not set, nothing to publish.");
        return Ok(());
    }

    let version = config.resolve_version(ctx.version.as_deref());
    let env_dir = config.publish_dir.join(&ctx.env_name);
    let published_bin = env_dir.join(published_bin_name(&version, &ctx.env_name));

    println!("=== Publishing {} ===\n", ctx.env_name);

    let app_bin = ctx.app_bin();
    if !app_bin.exists() {
        bail!(
            "Application binary not found at {}.\n\
             Run the firmware build first.",
            app_bin.display()
        );
    }

    provision_publish_dir(&config.publish_dir, &env_dir)?;

    // Auxiliary images keep their basenames; the app binary gets the
    // canonical published name.
    for image in &ctx.flash_images {
        copy_into(&image.path, &env_dir)?;
    }

    println!(
        "  Copying {} -> {}",
        app_bin.display(),
        published_bin.display()
    );
    fs::copy(&app_bin, &published_bin).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            app_bin.display(),
            published_bin.display()
        )
    })?;

    let chip_family = ctx.define_value("CHIP_FAMILY").unwrap_or_default();

    // Parts in flash order: auxiliary images first, the app image last.
    let mut parts = ctx.flash_images.clone();
    parts.push(FlashImage::new(ctx.app_offset(), published_bin.clone()));

    let manifest = WebManifest::assemble(
        manifest_name(ctx),
        &version,
        chip_family,
        &ctx.env_name,
        &parts,
    )?;
    let manifest_path = env_dir.join("manifest.json");
    manifest.save(&manifest_path)?;

    let checksum_path = checksum::write_checksum(&published_bin)?;

    print_publish_summary(&published_bin, &manifest_path, &checksum_path, parts.len());
    Ok(())
}

/// Copy a file into a directory, keeping its basename.
fn copy_into(source: &Path, dir: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .with_context(|| format!("Image path has no filename: {}", source.display()))?;
    let dest = dir.join(name);
    println!("  Copying {} -> {}", source.display(), dest.display());
    fs::copy(source, &dest).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), dest.display())
    })?;
    Ok(dest)
}

fn print_publish_summary(bin: &Path, manifest: &Path, checksum: &Path, part_count: usize) {
    println!("\n=== Publish Complete ===");
    println!("  Binary:   {}", bin.display());
    match fs::metadata(bin) {
        Ok(meta) => println!("  Size:     {} KB", meta.len() / 1024),
        Err(e) => eprintln!("  [WARN] Could not read binary size: {}", e),
    }
    println!("  Manifest: {} ({} parts)", manifest.display(), part_count);
    println!("  Checksum: {}", checksum.display());
}
