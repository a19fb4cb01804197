//! Preflight checks - verify the publish toolchain before a build.

use anyhow::{bail, Result};
use std::path::Path;

use crate::context::BuildContext;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Check failed - publishing will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
}

impl CheckResult {
    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
                CheckStatus::Warn => ("⚠", "WARN"),
            };

            print!("  {} [{}] {}", icon, status_str, check.name);
            if let Some(details) = &check.details {
                println!(": {}", details);
            } else {
                println!();
            }
        }

        let passed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        println!("\nSummary: {}/{} passed", passed, self.checks.len());
        if self.fail_count() > 0 {
            println!("         {} FAILED - publishing will not succeed", self.fail_count());
        }
    }
}

/// Run all preflight checks.
pub fn run_preflight(context_path: &Path) -> PreflightReport {
    let mut checks = Vec::new();
    checks.push(check_esptool());
    checks.push(check_context(context_path));
    PreflightReport { checks }
}

/// Run preflight and fail hard on any failed check.
pub fn run_preflight_or_fail(context_path: &Path) -> Result<()> {
    let report = run_preflight(context_path);
    report.print();
    if !report.all_passed() {
        bail!("{} preflight check(s) failed", report.fail_count());
    }
    Ok(())
}

/// esptool is required to merge ESP32 images during export.
fn check_esptool() -> CheckResult {
    match which::which("esptool") {
        Ok(path) => CheckResult::pass_with("esptool", &path.to_string_lossy()),
        Err(_) => CheckResult::fail(
            "esptool",
            "Not found. Install with 'pip install esptool'. Required to merge ESP32 images.",
        ),
    }
}

/// The build hook must have written a readable context file.
fn check_context(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::warn(
            "build context",
            &format!("{} not found (the build hook writes it)", path.display()),
        );
    }
    match BuildContext::load(path) {
        Ok(ctx) => CheckResult::pass_with("build context", &ctx.env_name),
        Err(e) => CheckResult::fail("build context", &format!("{:#}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_all_passed() {
        let report = PreflightReport {
            checks: vec![
                CheckResult::pass_with("a", "ok"),
                CheckResult::warn("b", "meh"),
            ],
        };
        assert!(report.all_passed());
        assert_eq!(report.fail_count(), 0);
    }

    #[test]
    fn test_report_with_failure() {
        let report = PreflightReport {
            checks: vec![CheckResult::fail("a", "missing")],
        };
        assert!(!report.all_passed());
        assert_eq!(report.fail_count(), 1);
    }

    #[test]
    fn test_check_context_missing_is_warn() {
        let result = check_context(Path::new("/nonexistent/build-context.json"));
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[test]
    fn test_check_context_invalid_json_is_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build-context.json");
        std::fs::write(&path, "not json").unwrap();

        let result = check_context(&path);
        assert_eq!(result.status, CheckStatus::Fail);
    }
}
