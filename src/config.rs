//! Tunables for the merge engine and for how the CLI accepts input packs.

use crate::zip::DosDateTime;

/// Default DEFLATE level for the merged archive.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Packs larger than this need explicit confirmation (75 MiB).
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 75 * 1024 * 1024;

/// Options for [`MergeEngine`](crate::MergeEngine).
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// DEFLATE level, 0-9
    pub compression_level: u32,
    /// Timestamp for every entry; `None` stamps the current local time
    pub modified: Option<DosDateTime>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            modified: None,
        }
    }
}

impl MergeOptions {
    pub fn with_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_modified(mut self, modified: DosDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub(crate) fn timestamp(&self) -> DosDateTime {
        self.modified.unwrap_or_else(DosDateTime::now)
    }
}

/// Policy applied while collecting input packs from disk.
#[derive(Debug, Clone)]
pub struct InputPolicy {
    /// Soft size limit per pack in bytes
    pub max_input_size: u64,
    /// Accept packs above the limit instead of skipping them
    pub allow_large: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            allow_large: false,
        }
    }
}
