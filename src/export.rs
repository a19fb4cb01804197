//! Single-image export pipeline.
//!
//! ESP32-family chips boot from one combined image, so the bootloader,
//! partition table and application are merged with esptool into a single
//! binary flashed at 0x0. ESP8266 builds already produce one image and
//! are copied as-is. Either way the uploader flag list is rewritten to
//! upload only the combined binary.

use anyhow::{bail, Context as _, Result};
use std::fs;
use std::path::Path;

use crate::checksum;
use crate::config::Config;
use crate::context::BuildContext;
use crate::manifest::sanitize_chip_family;
use crate::process::Cmd;
use crate::publish::published_bin_name;
use crate::uploader;

/// Run the export pipeline for one build environment.
///
/// Gated on the PUBLISH compile-time define: when absent this performs
/// no filesystem action at all.
pub fn run_export(config: &Config, ctx: &BuildContext, flags_out: Option<&Path>) -> Result<()> {
    if !ctx.is_defined("PUBLISH") {
        println!("[SKIP] PUBLISH not defined for this build, nothing to export.");
        return Ok(());
    }

    let version = config.resolve_version(ctx.version.as_deref());
    let published_bin = config
        .publish_dir
        .join(published_bin_name(&version, &ctx.env_name));

    println!("=== Exporting {} ===\n", ctx.env_name);

    let app_bin = ctx.app_bin();
    if !app_bin.exists() {
        bail!(
            "Application binary not found at {}.\n\
             Run the firmware build first.",
            app_bin.display()
        );
    }

    // Export publishes flat into the publish root, no per-env subdirectory.
    fs::create_dir_all(&config.publish_dir)
        .with_context(|| format!("Failed to create {}", config.publish_dir.display()))?;

    let chip_family = sanitize_chip_family(ctx.define_value("CHIP_FAMILY").unwrap_or_default());
    if chip_family.starts_with("ESP32") {
        merge_images(ctx, &app_bin, &published_bin)?;
    } else {
        // esp8266: the app binary is already a complete flash image.
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
    }

    let checksum_path = checksum::write_checksum(&published_bin)?;

    let flags = uploader::rewrite_upload_flags(&ctx.upload_flags, &ctx.flash_images, &published_bin);
    let flags_path = flags_out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.build_dir.join("upload_flags.txt"));
    uploader::write_flags_file(&flags_path, &flags)?;

    println!("\n=== Export Complete ===");
    println!("  Binary:   {}", published_bin.display());
    println!("  Checksum: {}", checksum_path.display());
    println!("  Flags:    {}", flags_path.display());
    Ok(())
}

/// Merge all flash images into one binary via esptool.
///
/// Argument order follows flash order: each auxiliary (offset, path)
/// pair, then the application image at its configured offset.
fn merge_images(ctx: &BuildContext, app_bin: &Path, output: &Path) -> Result<()> {
    println!(
        "  Merging {} images via esptool...",
        ctx.flash_images.len() + 1
    );

    let mut cmd = Cmd::new("esptool")
        .args(["--chip", ctx.mcu(), "merge_bin", "-o"])
        .arg_path(output);

    for image in &ctx.flash_images {
        cmd = cmd.arg(&image.offset).arg_path(&image.path);
    }
    cmd = cmd.arg(ctx.app_offset()).arg_path(app_bin);

    cmd.error_msg("esptool merge_bin failed").run()?;
    Ok(())
}
