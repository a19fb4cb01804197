//! Tallypub - ATEM tally light firmware publisher.
//!
//! Post-build tool for the firmware build system:
//! - Copies flash images into a publish tree under canonical names
//! - Writes the web flasher manifest (ESP Web Tools schema)
//! - Merges images into a single combined binary via esptool

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tallypub::commands;
use tallypub::commands::clean::CleanTarget;
use tallypub::commands::show::ShowTarget;
use tallypub::config::Config;

#[derive(Parser)]
#[command(name = "tallypub")]
#[command(about = "ATEM tally light firmware publish tool")]
#[command(
    after_help = "QUICK START:\n  tallypub preflight  Check esptool and the build context\n  tallypub publish    Copy flash images + write web flasher manifest\n  tallypub export     Merge flash images into one binary\n  tallypub clean      Remove published artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish discrete flash images and the web flasher manifest
    Publish {
        /// Build context file written by the build hook
        #[arg(long, default_value = "build-context.json")]
        context: PathBuf,
    },

    /// Merge flash images into one combined binary (rewrites upload flags)
    Export {
        /// Build context file written by the build hook
        #[arg(long, default_value = "build-context.json")]
        context: PathBuf,
        /// Where to write the rewritten uploader flags
        /// (default: <build_dir>/upload_flags.txt)
        #[arg(long)]
        flags_out: Option<PathBuf>,
    },

    /// Run preflight checks (verify esptool and the build context)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
        /// Build context file to validate
        #[arg(long, default_value = "build-context.json")]
        context: PathBuf,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowWhat,
    },

    /// Remove published artifacts
    Clean {
        /// Clean a single environment's subdirectory instead of everything
        #[arg(long)]
        env: Option<String>,
    },
}

#[derive(Subcommand)]
enum ShowWhat {
    /// Show tool configuration
    Config,
    /// Show a parsed build context
    Context {
        #[arg(long, default_value = "build-context.json")]
        context: PathBuf,
    },
    /// List published artifacts
    Published,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = std::env::current_dir()?;

    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::load(&base_dir);

    match cli.command {
        Commands::Publish { context } => {
            commands::cmd_publish(&config, &context)?;
        }

        Commands::Export { context, flags_out } => {
            commands::cmd_export(&config, &context, flags_out.as_deref())?;
        }

        Commands::Preflight { strict, context } => {
            commands::cmd_preflight(&context, strict)?;
        }

        Commands::Show { what } => {
            let target = match what {
                ShowWhat::Config => ShowTarget::Config,
                ShowWhat::Context { ref context } => ShowTarget::Context { path: context },
                ShowWhat::Published => ShowTarget::Published,
            };
            commands::cmd_show(&config, target)?;
        }

        Commands::Clean { env } => {
            let target = match env {
                Some(name) => CleanTarget::Env(name),
                None => CleanTarget::All,
            };
            commands::cmd_clean(&config, target)?;
        }
    }

    Ok(())
}
