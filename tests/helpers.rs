//! Shared test utilities for tallypub tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tallypub::config::Config;
use tallypub::context::{BuildContext, Define, FlashImage};

/// Test environment with a temporary build tree and publish root.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Base directory (project root simulation)
    pub base_dir: PathBuf,
    /// Mock build output directory
    pub build_dir: PathBuf,
    /// Publish root
    pub publish_dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with temporary directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        let build_dir = base_dir.join("build");
        let publish_dir = base_dir.join("publish");

        fs::create_dir_all(&build_dir).expect("Failed to create build dir");

        Self {
            _temp_dir: temp_dir,
            base_dir,
            build_dir,
            publish_dir,
        }
    }

    /// Tool configuration pointing at this environment's publish root.
    pub fn config(&self, publish: bool, version: Option<&str>) -> Config {
        Config {
            publish,
            version: version.map(str::to_string),
            publish_dir: self.publish_dir.clone(),
        }
    }

    /// Build context for an ESP32 environment with the usual auxiliary
    /// images (bootloader + partition table) and a compiled app binary.
    pub fn esp32_context(&self) -> BuildContext {
        let bootloader = self.build_dir.join("bootloader.bin");
        let partitions = self.build_dir.join("partitions.bin");
        create_mock_image(&bootloader, b"BOOT");
        create_mock_image(&partitions, b"PART");
        create_mock_image(&self.build_dir.join("firmware.bin"), b"\xe9APP");

        BuildContext {
            env_name: "esp32dev".to_string(),
            version: None,
            build_dir: self.build_dir.clone(),
            prog_name: "firmware".to_string(),
            defines: vec![
                Define::Valued("CHIP_FAMILY".to_string(), "\\\"ESP32\\\"".to_string()),
            ],
            board_mcu: Some("esp32".to_string()),
            flash_images: vec![
                FlashImage::new("0x1000", bootloader),
                FlashImage::new("0x8000", partitions),
            ],
            app_offset: Some("0x10000".to_string()),
            upload_flags: Vec::new(),
            display_name: None,
        }
    }

    /// Build context for an ESP8266 environment: no auxiliary images,
    /// app flashed alone at 0x00.
    pub fn esp8266_context(&self) -> BuildContext {
        create_mock_image(&self.build_dir.join("firmware.bin"), b"\xe9APP8266");

        BuildContext {
            env_name: "esp8266".to_string(),
            version: None,
            build_dir: self.build_dir.clone(),
            prog_name: "firmware".to_string(),
            defines: vec![Define::Valued(
                "CHIP_FAMILY".to_string(),
                "\\\"ESP8266\\\"".to_string(),
            )],
            board_mcu: None,
            flash_images: Vec::new(),
            app_offset: None,
            upload_flags: Vec::new(),
            display_name: None,
        }
    }
}

/// Create a mock flash image file.
pub fn create_mock_image(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir for image");
    }
    fs::write(path, content).expect("Failed to create mock image");
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
}
