//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `publish` - Multi-image publish with web flasher manifest
//! - `export` - Merge images into a single binary
//! - `preflight` - Verify the publish toolchain
//! - `show` - Display information
//! - `clean` - Remove published artifacts

pub mod clean;
pub mod export;
pub mod preflight;
pub mod publish;
pub mod show;

pub use clean::cmd_clean;
pub use export::cmd_export;
pub use preflight::cmd_preflight;
pub use publish::cmd_publish;
pub use show::cmd_show;
