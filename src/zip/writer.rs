//! In-memory ZIP archive writer.
//!
//! Entries are appended as local header + data, the Central Directory is
//! collected alongside and written out by [`ZipWriter::finish`]. ZIP64
//! fields and records are added only where a size, offset or entry count
//! does not fit the classic layout.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::Write;

use anyhow::{Result, bail};

use super::structures::*;

/// Central Directory record kept until the archive is finished
struct CentralRecord {
    file_name: String,
    method: CompressionMethod,
    crc32: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    lfh_offset: u64,
}

impl CentralRecord {
    /// ZIP64 extra field for the values that overflow 32 bits, in the
    /// order the format fixes
    fn zip64_extra(&self) -> Vec<u8> {
        let values: Vec<u64> = [self.uncompressed_size, self.compressed_size, self.lfh_offset]
            .into_iter()
            .filter(|&v| v >= ZIP64_MARKER_32 as u64)
            .collect();
        if values.is_empty() {
            return Vec::new();
        }

        let mut extra = Vec::with_capacity(4 + values.len() * 8);
        extra.extend_from_slice(&ZIP64_EXTRA_ID.to_le_bytes());
        extra.extend_from_slice(&((values.len() * 8) as u16).to_le_bytes());
        for value in values {
            extra.extend_from_slice(&value.to_le_bytes());
        }
        extra
    }
}

/// Builds a ZIP archive in a byte buffer.
pub struct ZipWriter {
    buf: Vec<u8>,
    records: Vec<CentralRecord>,
    level: Compression,
    modified: DosDateTime,
}

impl ZipWriter {
    /// Create a writer compressing at `level` (0-9, clamped) and stamping
    /// every entry with `modified`.
    pub fn new(level: u32, modified: DosDateTime) -> Self {
        Self {
            buf: Vec::new(),
            records: Vec::new(),
            level: Compression::new(level.min(9)),
            modified,
        }
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a file entry.
    ///
    /// The data is deflated; when that does not make it smaller the entry
    /// is stored as-is.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if name.len() > u16::MAX as usize {
            bail!("Entry name is too long ({} bytes)", name.len());
        }
        let lfh_offset = self.buf.len() as u64;
        let uncompressed_size = data.len() as u64;

        let mut crc = Crc::new();
        crc.update(data);

        let deflated = if data.is_empty() {
            None
        } else {
            let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
            encoder.write_all(data)?;
            Some(encoder.finish()?).filter(|deflated| deflated.len() < data.len())
        };
        let (method, payload) = match deflated {
            Some(ref deflated) => (CompressionMethod::Deflate, deflated.as_slice()),
            None => (CompressionMethod::Stored, data),
        };
        let compressed_size = payload.len() as u64;

        // Local sizes go to the extra field as a pair, or not at all
        let large = uncompressed_size >= ZIP64_MARKER_32 as u64;

        let out = &mut self.buf;
        out.write_all(LFH_SIGNATURE)?;
        out.write_u16::<LittleEndian>(if large { VERSION_NEEDED_ZIP64 } else { VERSION_NEEDED })?;
        out.write_u16::<LittleEndian>(FLAG_UTF8)?;
        out.write_u16::<LittleEndian>(method.as_u16())?;
        out.write_u16::<LittleEndian>(self.modified.time)?;
        out.write_u16::<LittleEndian>(self.modified.date)?;
        out.write_u32::<LittleEndian>(crc.sum())?;
        if large {
            out.write_u32::<LittleEndian>(ZIP64_MARKER_32)?;
            out.write_u32::<LittleEndian>(ZIP64_MARKER_32)?;
        } else {
            out.write_u32::<LittleEndian>(compressed_size as u32)?;
            out.write_u32::<LittleEndian>(uncompressed_size as u32)?;
        }
        out.write_u16::<LittleEndian>(name.len() as u16)?;
        out.write_u16::<LittleEndian>(if large { 20 } else { 0 })?; // extra field length
        out.write_all(name.as_bytes())?;
        if large {
            out.write_u16::<LittleEndian>(ZIP64_EXTRA_ID)?;
            out.write_u16::<LittleEndian>(16)?;
            out.write_u64::<LittleEndian>(uncompressed_size)?;
            out.write_u64::<LittleEndian>(compressed_size)?;
        }
        out.write_all(payload)?;

        self.records.push(CentralRecord {
            file_name: name.to_string(),
            method,
            crc32: crc.sum(),
            compressed_size,
            uncompressed_size,
            lfh_offset,
        });

        Ok(())
    }

    /// Write the Central Directory and EOCD, returning the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cd_offset = self.buf.len() as u64;

        for record in &self.records {
            let extra = record.zip64_extra();
            let version_needed = if extra.is_empty() {
                VERSION_NEEDED
            } else {
                VERSION_NEEDED_ZIP64
            };

            let out = &mut self.buf;
            out.write_all(CDFH_SIGNATURE)?;
            out.write_u16::<LittleEndian>(VERSION_MADE_BY)?;
            out.write_u16::<LittleEndian>(version_needed)?;
            out.write_u16::<LittleEndian>(FLAG_UTF8)?;
            out.write_u16::<LittleEndian>(record.method.as_u16())?;
            out.write_u16::<LittleEndian>(self.modified.time)?;
            out.write_u16::<LittleEndian>(self.modified.date)?;
            out.write_u32::<LittleEndian>(record.crc32)?;
            out.write_u32::<LittleEndian>(marked_32(record.compressed_size))?;
            out.write_u32::<LittleEndian>(marked_32(record.uncompressed_size))?;
            out.write_u16::<LittleEndian>(record.file_name.len() as u16)?;
            out.write_u16::<LittleEndian>(extra.len() as u16)?;
            out.write_u16::<LittleEndian>(0)?; // file comment length
            out.write_u16::<LittleEndian>(0)?; // disk number start
            out.write_u16::<LittleEndian>(0)?; // internal attributes
            out.write_u32::<LittleEndian>(0o100644 << 16)?; // regular file, rw-r--r--
            out.write_u32::<LittleEndian>(marked_32(record.lfh_offset))?;
            out.write_all(record.file_name.as_bytes())?;
            out.write_all(&extra)?;
        }

        let cd_end = self.buf.len() as u64;
        let cd_size = cd_end - cd_offset;
        let total_entries = self.records.len() as u64;

        let eocd = EndOfCentralDirectory::single_disk(
            marked_16(total_entries),
            marked_32(cd_size),
            marked_32(cd_offset),
        );
        if eocd.is_zip64() {
            Zip64EOCD::single_disk(total_entries, cd_size, cd_offset).write_to(&mut self.buf)?;
            Zip64EOCDLocator::single_disk(cd_end).write_to(&mut self.buf)?;
        }
        eocd.write_to(&mut self.buf)?;

        Ok(self.buf)
    }
}

/// `value`, or the ZIP64 marker when it does not fit a 16-bit field
fn marked_16(value: u64) -> u16 {
    if value >= ZIP64_MARKER_16 as u64 {
        ZIP64_MARKER_16
    } else {
        value as u16
    }
}

/// `value`, or the ZIP64 marker when it does not fit a 32-bit field
fn marked_32(value: u64) -> u32 {
    if value >= ZIP64_MARKER_32 as u64 {
        ZIP64_MARKER_32
    } else {
        value as u32
    }
}
