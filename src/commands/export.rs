//! Export command - single combined binary plus uploader flag rewrite.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::context::BuildContext;
use crate::export;

/// Execute the export command.
pub fn cmd_export(config: &Config, context_path: &Path, flags_out: Option<&Path>) -> Result<()> {
    let ctx = BuildContext::load(context_path)?;
    export::run_export(config, &ctx, flags_out)
}
