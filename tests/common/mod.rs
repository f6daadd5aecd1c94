//! Shared fixtures: building input packs and reading merged output with the
//! `zip` crate, independently of packmerge's own reader.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use packmerge::SourcePack;

/// Build a pack with DEFLATE entries. Names ending in `/` become directories.
pub fn deflated(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(entries, CompressionMethod::Deflated)
}

/// Build a pack with STORED entries, so entry data can be located and damaged.
pub fn stored(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(entries, CompressionMethod::Stored)
}

fn build(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn pack(name: &str, data: Vec<u8>) -> SourcePack {
    SourcePack::new(name, data)
}

/// Every file entry of an archive, by path. Panics on duplicates or on any
/// entry the `zip` crate cannot decode (it verifies CRC-32).
pub fn read_files(archive: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut files = BTreeMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        assert!(!entry.is_dir(), "unexpected directory {}", entry.name());
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        let name = entry.name().to_string();
        assert!(files.insert(name.clone(), data).is_none(), "duplicate entry {name}");
    }
    files
}

/// Paths of an archive without the synthesized pack.mcmeta / pack.png
pub fn content_paths(archive: &[u8]) -> Vec<String> {
    read_files(archive)
        .into_keys()
        .filter(|p| p != "pack.mcmeta" && p != "pack.png")
        .collect()
}

/// Flip one byte inside the first occurrence of `needle`.
pub fn corrupt_stored(archive: &mut [u8], needle: &[u8]) {
    let pos = archive
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("needle not found in archive");
    archive[pos + needle.len() / 2] ^= 0xFF;
}

/// Overwrite the start of a DEFLATE entry's data with an invalid block header.
pub fn corrupt_deflated(archive: &mut Vec<u8>, path: &str) {
    let start = {
        let mut zip = ZipArchive::new(Cursor::new(archive.as_slice())).unwrap();
        let entry = zip.by_name(path).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        entry.data_start() as usize
    };
    // BFINAL=1, BTYPE=11 (reserved)
    archive[start] = 0xFF;
}

/// Build a STORED pack whose entries carry ZIP64 extra fields
pub fn large_file(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Build a DEFLATE pack with an archive comment
pub fn commented(entries: &[(&str, &[u8])], comment: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.set_comment(comment);
    writer.finish().unwrap().into_inner()
}

/// Replace every occurrence of `from` with `to`, headers included.
pub fn rename_raw(archive: &mut [u8], from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let mut found = 0;
    let mut i = 0;
    while i + from.len() <= archive.len() {
        if &archive[i..i + from.len()] == from {
            archive[i..i + from.len()].copy_from_slice(to);
            found += 1;
            i += from.len();
        } else {
            i += 1;
        }
    }
    assert!(found > 0, "name not found in archive");
}

/// Offset of the Local File Header of `path` (its first name occurrence)
pub fn local_header(archive: &[u8], path: &str) -> usize {
    let pos = archive
        .windows(path.len())
        .position(|w| w == path.as_bytes())
        .expect("path not found in archive");
    let header = pos - 30;
    assert_eq!(&archive[header..header + 4], b"PK\x03\x04");
    header
}

/// Offset of the Central Directory header of `path` (its last name occurrence)
pub fn central_header(archive: &[u8], path: &str) -> usize {
    let pos = archive
        .windows(path.len())
        .rposition(|w| w == path.as_bytes())
        .expect("path not found in archive");
    let header = pos - 46;
    assert_eq!(&archive[header..header + 4], b"PK\x01\x02");
    header
}

fn or_u16(archive: &mut [u8], at: usize, bits: u16) {
    let value = u16::from_le_bytes([archive[at], archive[at + 1]]) | bits;
    archive[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// Set the "encrypted" flag of `path` in both headers
pub fn mark_encrypted(archive: &mut [u8], path: &str) {
    let local = local_header(archive, path);
    let central = central_header(archive, path);
    or_u16(archive, local + 6, 0x0001);
    or_u16(archive, central + 8, 0x0001);
}

/// Rewrite the compression method of `path` in both headers
pub fn set_method(archive: &mut [u8], path: &str, method: u16) {
    let local = local_header(archive, path);
    let central = central_header(archive, path);
    archive[local + 8..local + 10].copy_from_slice(&method.to_le_bytes());
    archive[central + 10..central + 12].copy_from_slice(&method.to_le_bytes());
}

/// Destroy the Local File Header signature of `path`
pub fn break_local_header(archive: &mut [u8], path: &str) {
    let local = local_header(archive, path);
    archive[local..local + 4].copy_from_slice(b"PK\x00\x00");
}

/// Claim a compressed size for `path` that runs past the end of the archive
pub fn oversize_entry(archive: &mut [u8], path: &str) {
    let central = central_header(archive, path);
    archive[central + 20..central + 24].copy_from_slice(&0x7FFF_0000u32.to_le_bytes());
}
