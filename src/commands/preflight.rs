//! Preflight command - runs preflight checks.

use anyhow::Result;
use std::path::Path;

use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(context_path: &Path, strict: bool) -> Result<()> {
    if strict {
        preflight::run_preflight_or_fail(context_path)?;
    } else {
        let report = preflight::run_preflight(context_path);
        report.print();
        if !report.all_passed() {
            println!("Some checks failed. Use --strict to fail the build.");
        }
    }
    Ok(())
}
