//! Error types for merging resource packs.
//!
//! Fatal failures are [`Error`] values and abort the merge without
//! producing any output. A single unreadable entry inside an otherwise
//! valid pack is not fatal: it becomes an [`EntryDecodeError`], is logged,
//! and is reported back in [`MergedPack::skipped`](crate::MergedPack::skipped).

use thiserror::Error;

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal merge errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An input buffer could not be read as a zip archive at all.
    #[error("input #{index} ({name}) is not a readable zip archive: {reason}")]
    InputFormat {
        /// Position of the pack in the input order
        index: usize,
        /// Display name of the pack
        name: String,
        reason: String,
    },

    /// The request itself is unusable, e.g. no packs were supplied.
    #[error("{0}")]
    Validation(String),

    /// The merged archive could not be encoded.
    #[error("failed to build merged archive: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Index of the input pack that caused the failure, if any.
    pub fn input_index(&self) -> Option<usize> {
        match self {
            Error::InputFormat { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// An entry that was skipped because its data could not be decoded.
#[derive(Debug, Clone, Error)]
#[error("skipped {path} from input #{index} ({pack}): {reason}")]
pub struct EntryDecodeError {
    pub index: usize,
    pub pack: String,
    pub path: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_format_names_the_pack() {
        let err = Error::InputFormat {
            index: 2,
            name: "Faithful.zip".to_string(),
            reason: "Not a valid ZIP file".to_string(),
        };
        assert_eq!(err.input_index(), Some(2));
        let msg = err.to_string();
        assert!(msg.contains("#2"));
        assert!(msg.contains("Faithful.zip"));
    }

    #[test]
    fn validation_has_no_input() {
        let err = Error::Validation("no resource packs to merge".to_string());
        assert_eq!(err.input_index(), None);
        assert_eq!(err.to_string(), "no resource packs to merge");
    }
}
