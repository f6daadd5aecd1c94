use log::{debug, info, warn};

use crate::config::MergeOptions;
use crate::error::{EntryDecodeError, Error, Result};
use crate::zip::ZipWriter;

use super::file_map::FileMap;
use super::metadata::{PACK_ICON_FILE, PACK_METADATA_FILE, PackMetadata, is_reserved};
use super::progress::{NoProgress, Phase, Progress, scaled};
use super::source::{SourceArchive, SourcePack};

/// Report building progress every this many files
const BUILD_REPORT_INTERVAL: usize = 50;

/// The merged archive and what went into it.
#[derive(Debug)]
pub struct MergedPack {
    /// Zip archive bytes
    pub data: Vec<u8>,
    /// Suggested download name, derived from the pack name
    pub file_name: String,
    /// Entries in the archive, synthesized metadata and icon included
    pub entry_count: usize,
    /// Paths that more than one pack supplied
    pub conflict_count: usize,
    /// Entries dropped because they could not be decoded
    pub skipped: Vec<EntryDecodeError>,
}

/// Result of reading every pack without building an archive.
#[derive(Debug)]
pub struct MergePlan {
    /// Pack names in input order
    pub packs: Vec<String>,
    pub files: FileMap,
    pub skipped: Vec<EntryDecodeError>,
}

/// Combines resource packs; later packs override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `sources` into a single archive carrying `metadata`.
    ///
    /// Fails if `sources` is empty or any source is not a readable zip; in
    /// both cases nothing is produced. Unreadable entries inside a readable
    /// source are left out and listed in [`MergedPack::skipped`].
    pub async fn merge<P>(
        &self,
        sources: &[SourcePack],
        metadata: &PackMetadata,
        progress: &P,
    ) -> Result<MergedPack>
    where
        P: Progress + ?Sized,
    {
        info!(
            "Merging {} resource packs into {:?}",
            sources.len(),
            metadata.effective_name()
        );
        let archives = open_all(sources, progress).await?;

        progress.report(Phase::Metadata, 45);
        let descriptor = metadata.descriptor().to_json()?;

        progress.report(Phase::Icon, 50);
        let icon = metadata.custom_icon();
        if icon.is_none() {
            debug!("No custom icon, {} left out", PACK_ICON_FILE);
        }

        let (files, skipped) = collect(&archives, progress).await;

        progress.report(Phase::Building, 85);
        let mut writer = ZipWriter::new(self.options.compression_level, self.options.timestamp());
        add(&mut writer, PACK_METADATA_FILE, &descriptor)?;
        if let Some(icon) = icon {
            add(&mut writer, PACK_ICON_FILE, icon)?;
        }

        let total = files.len();
        for (count, (path, file)) in files.iter().enumerate() {
            add(&mut writer, path, &file.data)?;

            let done = count + 1;
            if done % BUILD_REPORT_INTERVAL == 0 {
                progress.report(Phase::Building, scaled(85, 10, done, total));
                tokio::task::yield_now().await;
            }
        }

        progress.report(Phase::Generating, 95);
        let entry_count = writer.len();
        let data = writer.finish().map_err(|e| Error::Encode(format!("{e:#}")))?;

        progress.report(Phase::Complete, 100);
        let merged = MergedPack {
            data,
            file_name: metadata.file_name(),
            entry_count,
            conflict_count: files.conflict_count(),
            skipped,
        };
        info!(
            "Merged {} entries ({} conflicts, {} skipped) into {} bytes",
            merged.entry_count,
            merged.conflict_count,
            merged.skipped.len(),
            merged.data.len()
        );
        Ok(merged)
    }

    /// Read every pack and resolve conflicts without building an archive.
    pub async fn plan<P>(&self, sources: &[SourcePack], progress: &P) -> Result<MergePlan>
    where
        P: Progress + ?Sized,
    {
        let archives = open_all(sources, progress).await?;
        let (files, skipped) = collect(&archives, progress).await;
        progress.report(Phase::Complete, 100);

        Ok(MergePlan {
            packs: archives.iter().map(|a| a.name().to_string()).collect(),
            files,
            skipped,
        })
    }
}

/// Merge with default options and no progress reporting.
pub async fn merge(sources: &[SourcePack], metadata: &PackMetadata) -> Result<MergedPack> {
    MergeEngine::default()
        .merge(sources, metadata, &NoProgress)
        .await
}

async fn open_all<P>(sources: &[SourcePack], progress: &P) -> Result<Vec<SourceArchive>>
where
    P: Progress + ?Sized,
{
    if sources.is_empty() {
        return Err(Error::Validation(
            "at least one resource pack is required".to_string(),
        ));
    }

    progress.report(Phase::Loading, 10);
    let mut archives = Vec::with_capacity(sources.len());
    for (index, pack) in sources.iter().enumerate() {
        let archive = SourceArchive::open(index, pack).await?;
        debug!(
            "Opened #{} {} ({} entries)",
            index,
            pack.name,
            archive.entries().len()
        );
        archives.push(archive);
        progress.report(Phase::Loading, scaled(10, 30, index + 1, sources.len()));
    }
    Ok(archives)
}

/// Fold every non-reserved file of every archive into one map, in input
/// order. Entries that fail to decode are skipped and returned.
async fn collect<P>(archives: &[SourceArchive], progress: &P) -> (FileMap, Vec<EntryDecodeError>)
where
    P: Progress + ?Sized,
{
    let mut files = FileMap::new();
    let mut skipped = Vec::new();

    for (done, archive) in archives.iter().enumerate() {
        for entry in archive.entries() {
            if entry.is_directory {
                continue;
            }
            if is_reserved(&entry.file_name) {
                debug!("Dropping {} from {}", entry.file_name, archive.name());
                continue;
            }

            match archive.read(entry).await {
                Ok(data) => {
                    let replaced = files.insert(entry.file_name.clone(), archive.index(), data);
                    if let Some(loser) = replaced {
                        debug!(
                            "{} from #{} replaces the copy from #{}",
                            entry.file_name,
                            archive.index(),
                            loser
                        );
                    }
                }
                Err(e) => {
                    let error = EntryDecodeError {
                        index: archive.index(),
                        pack: archive.name().to_string(),
                        path: entry.file_name.clone(),
                        reason: format!("{e:#}"),
                    };
                    warn!("{}", error);
                    skipped.push(error);
                }
            }
        }
        progress.report(Phase::Merging, scaled(50, 35, done + 1, archives.len()));
    }

    (files, skipped)
}

fn add(writer: &mut ZipWriter, name: &str, data: &[u8]) -> Result<()> {
    writer
        .add_file(name, data)
        .map_err(|e| Error::Encode(format!("{name}: {e:#}")))
}
