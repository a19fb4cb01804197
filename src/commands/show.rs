//! Show command - displays information.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::Config;
use crate::context::BuildContext;
use crate::manifest::WebManifest;

/// Show target for the show command.
pub enum ShowTarget<'a> {
    /// Show tool configuration
    Config,
    /// Show a parsed build context
    Context { path: &'a Path },
    /// List published artifacts
    Published,
}

/// Execute the show command.
pub fn cmd_show(config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
        }
        ShowTarget::Context { path } => {
            let ctx = BuildContext::load(path)?;
            print_context(&ctx);
        }
        ShowTarget::Published => {
            show_published(config)?;
        }
    }
    Ok(())
}

fn print_context(ctx: &BuildContext) {
    println!("Build context:");
    println!("  Environment: {}", ctx.env_name);
    println!(
        "  Version:     {}",
        ctx.version.as_deref().unwrap_or("(unset)")
    );
    println!("  App binary:  {}", ctx.app_bin().display());
    println!("  App offset:  {}", ctx.app_offset());
    println!("  MCU:         {}", ctx.mcu());
    println!("  Defines:     {}", ctx.defines.len());
    println!("  Flash images:");
    for image in &ctx.flash_images {
        println!("    {}  {}", image.offset, image.path.display());
    }
    if ctx.flash_images.is_empty() {
        println!("    (none)");
    }
}

fn show_published(config: &Config) -> Result<()> {
    if !config.publish_dir.is_dir() {
        bail!(
            "No publish directory at {}. Run 'tallypub publish' first.",
            config.publish_dir.display()
        );
    }

    println!("Published artifacts in {}:", config.publish_dir.display());
    let mut total: u64 = 0;
    for entry in walkdir::WalkDir::new(&config.publish_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        total += size;
        let rel = entry
            .path()
            .strip_prefix(&config.publish_dir)
            .unwrap_or(entry.path());
        println!("  {:>8} KB  {}", size / 1024, rel.display());
    }
    println!("  Total: {} KB", total / 1024);

    // Surface each environment's manifest summary when present.
    for entry in std::fs::read_dir(&config.publish_dir)? {
        let entry = entry?;
        let manifest_path = entry.path().join("manifest.json");
        if manifest_path.is_file() {
            let manifest = WebManifest::load(&manifest_path)?;
            println!(
                "  Manifest {}: {} v{} ({} parts)",
                manifest_path.display(),
                manifest.name,
                manifest.version,
                manifest.builds.first().map(|b| b.parts.len()).unwrap_or(0)
            );
        }
    }
    Ok(())
}
