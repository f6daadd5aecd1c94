//! ZIP archive reading and writing.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: Decoding entry data into memory
//! - [`writer`]: Building a new archive in memory
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The reader starts from the EOCD and trusts the Central Directory for
//! names, sizes and checksums; local headers are only used to find where
//! each entry's data starts.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions, read and written
//! - STORED and DEFLATE compression methods
//! - UTF-8 entry names, with a CP437 fallback for names that are not
//! - Archives with a comment, trailing padding or data prepended
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support

mod cp437;
mod extractor;
mod parser;
mod structures;
mod writer;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
pub use writer::ZipWriter;
