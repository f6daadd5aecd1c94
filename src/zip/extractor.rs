use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Upper bound on the up-front allocation for an inflated entry. The
/// declared size comes from the archive and is only trusted after the
/// data has been decoded.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Extract file data to memory.
    ///
    /// The decoded bytes are checked against the size and CRC-32 recorded in
    /// the Central Directory, so a corrupt entry is reported here rather than
    /// copied into the output.
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("{} is encrypted", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser.reader().read_at(data_offset, &mut raw).await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                let capacity = entry.uncompressed_size.min(MAX_PREALLOC) as usize;
                let mut out = Vec::with_capacity(capacity);
                // Cap the decoder one byte past the declared size so a
                // deflate bomb stops early and still fails the size check.
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut out)
                    .with_context(|| format!("Corrupt DEFLATE stream in {}", entry.file_name))?;
                out
            }
            CompressionMethod::Unknown(method) => {
                bail!(
                    "Unsupported compression method {} for {} (only STORED and DEFLATE are supported)",
                    method,
                    entry.file_name
                );
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!(
                "CRC-32 mismatch for {}: expected {:08x}, got {:08x}",
                entry.file_name,
                entry.crc32,
                crc.sum()
            );
        }

        Ok(data)
    }
}
