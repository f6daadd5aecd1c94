//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. For extraction, read each file's Local File Header and data
//!
//! Every size and offset taken from the archive is checked against the
//! source size before a buffer is allocated for it, so a corrupt directory
//! fails cleanly instead of requesting an absurd allocation.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};
use log::debug;

use super::cp437;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP file parser.
///
/// Generic over the reader type; resource packs are parsed from
/// [`MemoryReader`](crate::io::MemoryReader) buffers.
///
/// Typically used through [`ZipExtractor`](super::ZipExtractor)
/// rather than directly.
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    /// Create a new parser for the given reader.
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD is located at the end of the ZIP file. This method
    /// handles both the simple case (no comment) and archives with
    /// comments or trailing padding by searching backwards for the
    /// signature.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in file).
    ///
    /// # Errors
    ///
    /// Returns an error if no valid EOCD can be found, indicating
    /// the source is not a ZIP archive.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            bail!("Not a valid ZIP file (only {} bytes)", self.size);
        }

        // Common case first: no archive comment.
        let offset = self.size - EndOfCentralDirectory::SIZE as u64;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_at(offset, &mut buf).await?;

        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
            return Ok((eocd, offset));
        }

        // The EOCD could be earlier if there's a ZIP comment or padding.
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_at(search_start, &mut buf).await?;

        // Search backwards for EOCD signature (PK\x05\x06). A record whose
        // comment ends exactly at the end of the file wins; otherwise the
        // last one whose comment fits is taken and the rest is padding.
        let mut fitting = None;
        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            let remaining = buf.len() - i - EndOfCentralDirectory::SIZE;

            if comment_len == remaining {
                fitting = Some(i);
                break;
            }
            if comment_len < remaining && fitting.is_none() {
                fitting = Some(i);
            }
        }

        match fitting {
            Some(i) => {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
                Ok((eocd, search_start + i as u64))
            }
            None => bail!("Not a valid ZIP file (no End of Central Directory record)"),
        }
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD indicates ZIP64 extensions are needed
    /// (fields set to 0xFFFF or 0xFFFFFFFF).
    ///
    /// # Returns
    ///
    /// The record and the offset it was actually found at, which differs
    /// from the locator's when data was prepended to the archive.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<(Zip64EOCD, u64)> {
        // The ZIP64 EOCD Locator is located immediately before the regular EOCD
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .context("Invalid ZIP64 format (missing locator)")?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        if self
            .reader
            .read_at(locator.eocd64_offset, &mut eocd64_buf)
            .await
            .is_ok()
            && &eocd64_buf[0..4] == Zip64EOCD::SIGNATURE
        {
            return Ok((Zip64EOCD::from_bytes(&eocd64_buf)?, locator.eocd64_offset));
        }

        // Prepended data: the record normally sits right before the locator
        let offset = locator_offset
            .checked_sub(Zip64EOCD::MIN_SIZE as u64)
            .context("Invalid ZIP64 format (missing record)")?;
        self.reader.read_at(offset, &mut eocd64_buf).await?;
        Ok((Zip64EOCD::from_bytes(&eocd64_buf)?, offset))
    }

    /// List all entries in the ZIP archive.
    ///
    /// Reads the EOCD first, then fetches and parses the whole Central
    /// Directory. Any failure here means the archive as a whole cannot be
    /// read.
    ///
    /// Offsets in the returned entries are absolute positions in the
    /// source, corrected for any data prepended to the archive.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        // Get Central Directory info, using ZIP64 if needed. `cd_end` is
        // where the Central Directory actually ends in the source.
        let (cd_offset, cd_size, total_entries, cd_end) = if eocd.is_zip64() {
            let (eocd64, eocd64_offset) = self.read_zip64_eocd(eocd_offset).await?;
            (
                eocd64.cd_offset,
                eocd64.cd_size,
                eocd64.total_entries,
                eocd64_offset,
            )
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
                eocd_offset,
            )
        };

        let shift = self.prefix_len(cd_offset, cd_size, cd_end).await?;
        if shift > 0 {
            debug!("{} bytes precede the archive", shift);
        }
        let cd_offset = cd_offset + shift;

        match cd_offset.checked_add(cd_size) {
            Some(end) if end <= self.size => {}
            _ => bail!(
                "Central Directory ({} bytes at offset {}) lies outside the archive",
                cd_size,
                cd_offset
            ),
        }
        // Each header takes at least CDFH_MIN_SIZE bytes
        if total_entries > cd_size / CDFH_MIN_SIZE as u64 {
            bail!(
                "Central Directory is too small for {} entries",
                total_entries
            );
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_at(cd_offset, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut cursor = Cursor::new(&cd_data);

        for index in 0..total_entries {
            let mut entry = self
                .parse_cdfh(&mut cursor)
                .with_context(|| format!("Central Directory entry #{index}"))?;
            entry.lfh_offset = entry
                .lfh_offset
                .checked_add(shift)
                .with_context(|| format!("Central Directory entry #{index}: bad offset"))?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Number of bytes in front of the archive proper, such as a
    /// self-extractor stub.
    ///
    /// The Central Directory should end where the record following it
    /// starts; any gap means every stored offset is short by that much.
    async fn prefix_len(&self, cd_offset: u64, cd_size: u64, cd_end: u64) -> Result<u64> {
        let expected_end = cd_offset
            .checked_add(cd_size)
            .context("Central Directory size overflows")?;

        if expected_end > cd_end {
            bail!(
                "Corrupt archive: Central Directory overlaps its end record by {} bytes",
                expected_end - cd_end
            );
        }
        let gap = cd_end - expected_end;
        if gap == 0 || cd_size == 0 {
            return Ok(0);
        }

        // Offsets that are already right but followed by junk
        let mut sig = [0u8; 4];
        if self.reader.read_at(cd_offset, &mut sig).await.is_ok() && sig == CDFH_SIGNATURE {
            return Ok(0);
        }
        Ok(gap)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&Vec<u8>>) -> Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        let file_name = decode_name(file_name_bytes);

        // Directory entries end with '/'
        let is_directory = file_name.ends_with('/');

        // ZIP64 extended information lives in extra field 0x0001
        let extra_field_end = cursor.position() + extra_field_length as u64;
        if extra_field_end > cursor.get_ref().len() as u64 {
            bail!("Extra field of {} runs past the Central Directory", file_name);
        }

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()?;

            if header_id == ZIP64_EXTRA_ID {
                // Fields are present only if the header field is 0xFFFFFFFF
                let marker = ZIP64_MARKER_32 as u64;
                if uncompressed_size == marker && cursor.position() + 8 <= extra_field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if compressed_size == marker && cursor.position() + 8 <= extra_field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if lfh_offset == marker && cursor.position() + 8 <= extra_field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>()?;
                }
                cursor.set_position(extra_field_end);
            } else {
                cursor.set_position(cursor.position() + field_size as u64);
            }
        }

        cursor.set_position(extra_field_end);

        // Skip over the file comment (we don't use it)
        cursor.set_position(cursor.position() + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            is_directory,
        })
    }

    /// Get the actual data offset for a file entry.
    ///
    /// The Local File Header (LFH) has variable-length fields (filename,
    /// extra field) that may differ from the Central Directory entry.
    /// This method reads the LFH to calculate where the actual file
    /// data begins, and checks that the entry's compressed data fits
    /// inside the archive.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader.read_at(entry.lfh_offset, &mut lfh_buf).await?;

        // Verify LFH signature (PK\x03\x04)
        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header");
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        // Data starts after: LFH (30 bytes) + filename + extra field
        let data_offset =
            entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length;

        match data_offset.checked_add(entry.compressed_size) {
            Some(end) if end <= self.size => Ok(data_offset),
            _ => bail!(
                "Data of {} ({} bytes) runs past the end of the archive",
                entry.file_name,
                entry.compressed_size
            ),
        }
    }

    /// Get a reference to the underlying reader.
    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}

/// Entry names are UTF-8 when they decode as such, whatever the flag says;
/// anything else is CP437, as written by old Windows tools.
fn decode_name(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(name) => name,
        Err(e) => cp437::decode(e.as_bytes()),
    }
}
