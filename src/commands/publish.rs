//! Publish command - multi-image publish with manifest.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::context::BuildContext;
use crate::publish;

/// Execute the publish command.
pub fn cmd_publish(config: &Config, context_path: &Path) -> Result<()> {
    let ctx = BuildContext::load(context_path)?;
    publish::run_publish(config, &ctx)
}
