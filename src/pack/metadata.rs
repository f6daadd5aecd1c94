use byteorder::{BigEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::Result;

/// Pack metadata descriptor, always synthesized for the merged pack
pub const PACK_METADATA_FILE: &str = "pack.mcmeta";
/// Pack icon, written only when a custom icon is supplied
pub const PACK_ICON_FILE: &str = "pack.png";

/// `pack_format` for Minecraft 1.20
pub const DEFAULT_PACK_FORMAT: u32 = 15;
pub const DEFAULT_PACK_NAME: &str = "Merged Resource Pack";
pub const DEFAULT_DESCRIPTION: &str = "A combination of multiple resource packs merged together";

/// Built-in 1x1 transparent PNG that stands in for "no icon chosen".
pub const PLACEHOLDER_ICON: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0xf8, 0xcf, 0x50,
    0x0f, 0x00, 0x03, 0x86, 0x01, 0x80, 0x5a, 0x34, 0x7d, 0x6b, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Whether `path` is one of the two files that are never copied from inputs
pub fn is_reserved(path: &str) -> bool {
    path == PACK_METADATA_FILE || path == PACK_ICON_FILE
}

pub fn is_placeholder_icon(bytes: &[u8]) -> bool {
    bytes == PLACEHOLDER_ICON
}

/// Derive the download file name from a pack name.
///
/// Everything outside `[A-Za-z0-9]` is dropped and `.zip` appended. A name
/// with nothing left falls back to the default pack name.
pub fn sanitize_file_name(name: &str) -> String {
    let stem: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if stem.is_empty() {
        return sanitize_file_name(DEFAULT_PACK_NAME);
    }
    format!("{stem}.zip")
}

/// Width and height from a PNG's IHDR chunk, or `None` if `bytes` is not a PNG.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || &bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let mut cursor = Cursor::new(&bytes[16..24]);
    let width = cursor.read_u32::<BigEndian>().ok()?;
    let height = cursor.read_u32::<BigEndian>().ok()?;
    Some((width, height))
}

/// User-supplied metadata for the merged pack.
#[derive(Debug, Clone)]
pub struct PackMetadata {
    pub name: String,
    pub description: String,
    pub format_version: u32,
    pub icon: Option<Vec<u8>>,
}

impl Default for PackMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            format_version: DEFAULT_PACK_FORMAT,
            icon: None,
        }
    }
}

impl PackMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_format_version(mut self, format_version: u32) -> Self {
        self.format_version = format_version;
        self
    }

    /// The name as given, or the default when it is empty
    pub fn effective_name(&self) -> &str {
        match self.name.as_str() {
            "" => DEFAULT_PACK_NAME,
            name => name,
        }
    }

    /// The description as given, or the default when it is empty
    pub fn effective_description(&self) -> &str {
        match self.description.as_str() {
            "" => DEFAULT_DESCRIPTION,
            description => description,
        }
    }

    /// The icon to write, if one was supplied and it is not the placeholder
    pub fn custom_icon(&self) -> Option<&[u8]> {
        self.icon
            .as_deref()
            .filter(|icon| !icon.is_empty() && !is_placeholder_icon(icon))
    }

    pub fn file_name(&self) -> String {
        sanitize_file_name(self.effective_name())
    }

    pub fn descriptor(&self) -> PackMcmeta {
        PackMcmeta {
            pack: PackSection {
                pack_format: self.format_version,
                description: self.effective_description().to_string(),
            },
        }
    }
}

/// Contents of `pack.mcmeta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMcmeta {
    pub pack: PackSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSection {
    pub pack_format: u32,
    pub description: String,
}

impl PackMcmeta {
    /// Pretty-printed JSON with two-space indentation
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_keeps_only_ascii_alphanumerics() {
        assert_eq!(sanitize_file_name("My Pack v1.2!"), "MyPackv12.zip");
        assert_eq!(sanitize_file_name("Faithful_32x"), "Faithful32x.zip");
        assert_eq!(sanitize_file_name("Über Pack"), "berPack.zip");
    }

    #[test]
    fn file_name_falls_back_to_default() {
        assert_eq!(sanitize_file_name("!!! ???"), "MergedResourcePack.zip");
        assert_eq!(sanitize_file_name(""), "MergedResourcePack.zip");
        assert_eq!(PackMetadata::default().file_name(), "MergedResourcePack.zip");
    }

    #[test]
    fn defaults_apply_to_empty_fields() {
        let meta = PackMetadata::new("", "");
        assert_eq!(meta.effective_name(), DEFAULT_PACK_NAME);
        assert_eq!(meta.effective_description(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn typed_values_are_kept_verbatim() {
        let meta = PackMetadata::new(" Vanilla+ ", " Crisper textures ");
        assert_eq!(meta.effective_name(), " Vanilla+ ");
        assert_eq!(meta.effective_description(), " Crisper textures ");
        assert_eq!(meta.file_name(), "Vanilla.zip");

        let meta = PackMetadata::new("   ", "\n");
        assert_eq!(meta.effective_name(), "   ");
        assert_eq!(meta.effective_description(), "\n");
        assert_eq!(meta.file_name(), "MergedResourcePack.zip");
    }

    #[test]
    fn descriptor_json_layout() {
        let meta = PackMetadata::new("x", "Hello \"world\"").with_format_version(18);
        let json = meta.descriptor().to_json().unwrap();
        let text = String::from_utf8(json).unwrap();
        assert_eq!(
            text,
            "{\n  \"pack\": {\n    \"pack_format\": 18,\n    \"description\": \"Hello \\\"world\\\"\"\n  }\n}"
        );

        let parsed: PackMcmeta = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, meta.descriptor());
    }

    #[test]
    fn placeholder_icon_is_not_custom() {
        let meta = PackMetadata::default().with_icon(PLACEHOLDER_ICON.to_vec());
        assert!(meta.custom_icon().is_none());
        assert!(PackMetadata::default().with_icon(Vec::new()).custom_icon().is_none());

        let icon = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let meta = PackMetadata::default().with_icon(icon.clone());
        assert_eq!(meta.custom_icon(), Some(icon.as_slice()));
    }

    #[test]
    fn placeholder_is_a_1x1_png() {
        assert_eq!(png_dimensions(PLACEHOLDER_ICON), Some((1, 1)));
        assert_eq!(png_dimensions(b"GIF89a"), None);
    }

    #[test]
    fn reserved_paths() {
        assert!(is_reserved("pack.mcmeta"));
        assert!(is_reserved("pack.png"));
        assert!(!is_reserved("assets/pack.png"));
        assert!(!is_reserved("Pack.png"));
    }
}
