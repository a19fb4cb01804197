//! Web flasher manifest - JSON document describing flashable image parts.
//!
//! The manifest is served over HTTP next to the publish tree, so part
//! paths are relative to the publish root (`<env>/<basename>`), never
//! absolute.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::context::FlashImage;

/// One flashable image part: publish-relative path plus byte offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPart {
    pub path: String,
    pub offset: u32,
}

/// One build entry. Always exactly one per manifest in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestBuild {
    #[serde(rename = "chipFamily")]
    pub chip_family: String,
    pub parts: Vec<ManifestPart>,
}

/// Manifest consumed by the browser-based flashing tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub version: String,
    pub new_install_skip_erase: bool,
    pub builds: Vec<ManifestBuild>,
}

impl WebManifest {
    /// Assemble a manifest from the images already copied into the
    /// per-environment publish directory, in flash order.
    pub fn assemble(
        name: &str,
        version: &str,
        chip_family: &str,
        env_name: &str,
        parts: &[FlashImage],
    ) -> Result<Self> {
        let parts = parts
            .iter()
            .map(|image| {
                let basename = image
                    .path
                    .file_name()
                    .with_context(|| format!("Image path has no filename: {}", image.path.display()))?
                    .to_string_lossy();
                Ok(ManifestPart {
                    path: format!("{}/{}", env_name, basename),
                    offset: parse_offset(&image.offset)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            new_install_skip_erase: true,
            builds: vec![ManifestBuild {
                chip_family: sanitize_chip_family(chip_family),
                parts,
            }],
        })
    }

    /// Write the manifest as JSON, overwriting any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        Ok(())
    }

    /// Load a manifest back from disk (used by `show`).
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        Ok(manifest)
    }
}

/// Parse a hex flash offset ("0x1000" or "1000") to an integer.
///
/// Malformed input fails the whole manifest; a silently defaulted offset
/// would flash an image to the wrong address.
pub fn parse_offset(offset: &str) -> Result<u32> {
    let trimmed = offset.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16)
        .with_context(|| format!("Invalid flash offset '{}'", offset))
}

/// Strip escaped quote characters from a chip family define value.
///
/// The define arrives as a C string literal (`\"ESP32\"`); the manifest
/// wants the bare identifier.
pub fn sanitize_chip_family(chip_family: &str) -> String {
    chip_family.replace("\\\"", "").replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_offset_with_prefix() {
        assert_eq!(parse_offset("0x1000").unwrap(), 4096);
        assert_eq!(parse_offset("0x00").unwrap(), 0);
    }

    #[test]
    fn test_parse_offset_without_prefix() {
        assert_eq!(parse_offset("8000").unwrap(), 0x8000);
    }

    #[test]
    fn test_parse_offset_malformed_fails() {
        let err = parse_offset("zz").unwrap_err();
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn test_sanitize_chip_family() {
        assert_eq!(sanitize_chip_family("\\\"ESP32\\\""), "ESP32");
        assert_eq!(sanitize_chip_family("\"ESP8266\""), "ESP8266");
        assert_eq!(sanitize_chip_family("ESP32-C3"), "ESP32-C3");
    }

    #[test]
    fn test_assemble_orders_and_parses_parts() {
        let parts = vec![
            FlashImage::new("0x1000", "/build/bootloader.bin"),
            FlashImage::new("0x8000", "/build/partitions.bin"),
            FlashImage::new("0x10000", "/build/firmware.bin"),
        ];

        let manifest =
            WebManifest::assemble("ATEM_tally_light", "1.2.3", "ESP32", "esp32dev", &parts)
                .unwrap();

        assert_eq!(manifest.builds.len(), 1);
        let build = &manifest.builds[0];
        assert_eq!(build.chip_family, "ESP32");

        let offsets: Vec<u32> = build.parts.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![4096, 32768, 65536]);

        let paths: Vec<&str> = build.parts.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "esp32dev/bootloader.bin",
                "esp32dev/partitions.bin",
                "esp32dev/firmware.bin"
            ]
        );
    }

    #[test]
    fn test_assemble_malformed_offset_fails_whole_manifest() {
        let parts = vec![FlashImage::new("zz", "/build/bootloader.bin")];
        assert!(
            WebManifest::assemble("ATEM_tally_light", "1.2.3", "ESP32", "esp32dev", &parts)
                .is_err()
        );
    }

    #[test]
    fn test_manifest_json_shape() {
        let parts = vec![FlashImage::new("0x00", PathBuf::from("app.bin"))];
        let manifest =
            WebManifest::assemble("ATEM_tally_light", "1.0.0", "ESP8266", "esp8266", &parts)
                .unwrap();

        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("\"chipFamily\":\"ESP8266\""));
        assert!(json.contains("\"new_install_skip_erase\":true"));
        assert!(json.contains("\"offset\":0"));

        let loaded: WebManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.builds[0].parts[0].path, "esp8266/app.bin");
    }
}
