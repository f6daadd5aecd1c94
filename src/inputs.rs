//! Loading resource packs from disk for the CLI.
//!
//! Mirrors what the file picker accepts: only `.zip` files, a soft size
//! limit that needs explicit confirmation, and no pack added twice (same
//! file name and size).

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::InputPolicy;
use crate::pack::SourcePack;

/// Why an input path was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotZip,
    TooLarge { size: u64, limit: u64 },
    /// Same name and size as the accepted input at this position
    Duplicate { of: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotZip => f.write_str("only .zip files are supported"),
            SkipReason::TooLarge { size, limit } => write!(
                f,
                "{} is over the {} limit (pass -y to merge it anyway)",
                format_size(*size),
                format_size(*limit)
            ),
            SkipReason::Duplicate { of } => write!(f, "already added as pack #{of}"),
        }
    }
}

/// Packs accepted for merging, in order, and the paths that were skipped.
#[derive(Debug, Default)]
pub struct LoadedInputs {
    pub packs: Vec<SourcePack>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// Read every acceptable pack in `paths`, keeping their order.
///
/// I/O failures (missing or unreadable files) are fatal; policy rejections
/// are logged and collected in [`LoadedInputs::skipped`].
pub async fn load_packs(paths: &[PathBuf], policy: &InputPolicy) -> Result<LoadedInputs> {
    let mut loaded = LoadedInputs::default();

    for path in paths {
        match check(path, policy, &loaded.packs).await? {
            Some(reason) => {
                match reason {
                    SkipReason::NotZip => error!("Skipping {}: {}", path.display(), reason),
                    _ => warn!("Skipping {}: {}", path.display(), reason),
                }
                loaded.skipped.push((path.clone(), reason));
            }
            None => {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                info!("Added: {} ({})", display_name(path), format_size(data.len() as u64));
                loaded.packs.push(SourcePack::new(display_name(path), data));
            }
        }
    }

    Ok(loaded)
}

async fn check(
    path: &Path,
    policy: &InputPolicy,
    accepted: &[SourcePack],
) -> Result<Option<SkipReason>> {
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Ok(Some(SkipReason::NotZip));
    }

    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();

    let name = display_name(path);
    if let Some(of) = accepted
        .iter()
        .position(|p| p.name == name && p.len() as u64 == size)
    {
        return Ok(Some(SkipReason::Duplicate { of }));
    }

    if size > policy.max_input_size {
        if !policy.allow_large {
            return Ok(Some(SkipReason::TooLarge {
                size,
                limit: policy.max_input_size,
            }));
        }
        warn!(
            "{} is {}, over the {} soft limit; merging anyway",
            name,
            format_size(size),
            format_size(policy.max_input_size)
        );
    }

    Ok(None)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn policy(max_input_size: u64, allow_large: bool) -> InputPolicy {
        InputPolicy {
            max_input_size,
            allow_large,
        }
    }

    #[tokio::test]
    async fn applies_picker_rules_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.zip");
        let notes = dir.path().join("notes.txt");
        let big = dir.path().join("Big.ZIP");
        let sub = dir.path().join("copy");
        fs::create_dir(&sub).unwrap();
        let dup = sub.join("base.zip");

        fs::write(&base, b"PK-base").unwrap();
        fs::write(&notes, b"hello").unwrap();
        fs::write(&big, vec![0u8; 64]).unwrap();
        fs::write(&dup, b"PK-base").unwrap();

        let paths = vec![base.clone(), notes.clone(), big.clone(), dup.clone()];
        let loaded = load_packs(&paths, &policy(32, false)).await.unwrap();

        assert_eq!(loaded.packs.len(), 1);
        assert_eq!(loaded.packs[0].name, "base.zip");
        assert_eq!(&*loaded.packs[0].data, b"PK-base");
        assert_eq!(
            loaded.skipped,
            vec![
                (notes, SkipReason::NotZip),
                (big.clone(), SkipReason::TooLarge { size: 64, limit: 32 }),
                (dup, SkipReason::Duplicate { of: 0 }),
            ]
        );

        // Confirmed large packs are accepted, extension match ignores case
        let loaded = load_packs(&[base, big], &policy(32, true)).await.unwrap();
        assert_eq!(loaded.packs.len(), 2);
        assert_eq!(loaded.packs[1].name, "Big.ZIP");
        assert!(loaded.skipped.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.zip");
        assert!(load_packs(&[missing], &InputPolicy::default()).await.is_err());
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(75 * 1024 * 1024), "75.00 MB");
    }
}
