use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::MemoryReader;
use crate::zip::{ZipExtractor, ZipFileEntry};

/// One input resource pack: the archive bytes and a name for messages.
#[derive(Clone)]
pub struct SourcePack {
    pub name: String,
    pub data: Arc<[u8]>,
}

impl SourcePack {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for SourcePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePack")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A source pack whose Central Directory has been read.
pub struct SourceArchive {
    index: usize,
    name: String,
    extractor: ZipExtractor<MemoryReader>,
    entries: Vec<ZipFileEntry>,
}

impl SourceArchive {
    /// Open input `index`. Failing to read the directory is fatal for the
    /// whole merge and reported as [`Error::InputFormat`].
    pub async fn open(index: usize, pack: &SourcePack) -> Result<Self> {
        let reader = Arc::new(MemoryReader::new(pack.data.clone()));
        let extractor = ZipExtractor::new(reader);
        let entries = extractor
            .list_files()
            .await
            .map_err(|e| Error::InputFormat {
                index,
                name: pack.name.clone(),
                reason: format!("{e:#}"),
            })?;

        Ok(Self {
            index,
            name: pack.name.clone(),
            extractor,
            entries,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// Decode one entry's bytes
    pub async fn read(&self, entry: &ZipFileEntry) -> anyhow::Result<Vec<u8>> {
        self.extractor.extract_to_memory(entry).await
    }
}
