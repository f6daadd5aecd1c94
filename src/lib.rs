//! # packmerge
//!
//! Merge Minecraft resource packs into a single pack.
//!
//! Packs are applied in order: when two packs contain the same file, the
//! one added later wins. The merged pack gets a new `pack.mcmeta` built from
//! the supplied name and description, and optionally a custom `pack.png`.
//!
//! ## Features
//!
//! - Reads ZIP and ZIP64 archives, STORED and DEFLATE entries, with CRC-32 checks
//! - Corrupt entries are skipped and reported instead of failing the merge
//! - Deterministic last-pack-wins conflict resolution
//! - Progress reporting through a callback
//!
//! ## Example
//!
//! ```no_run
//! use packmerge::{MergeEngine, MergeOptions, PackMetadata, Phase, SourcePack};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sources = vec![
//!         SourcePack::new("base.zip", std::fs::read("base.zip")?),
//!         SourcePack::new("overrides.zip", std::fs::read("overrides.zip")?),
//!     ];
//!     let metadata = PackMetadata::new("My Pack", "Base with overrides");
//!
//!     let engine = MergeEngine::new(MergeOptions::default());
//!     let merged = engine
//!         .merge(&sources, &metadata, &|phase: Phase, percent: u8| {
//!             eprintln!("{percent:>3}% {phase}");
//!         })
//!         .await?;
//!
//!     std::fs::write(&merged.file_name, &merged.data)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod io;
pub mod pack;
pub mod zip;

pub use cli::Cli;
pub use config::{InputPolicy, MergeOptions};
pub use error::{EntryDecodeError, Error, Result};
pub use io::{MemoryReader, ReadAt};
pub use pack::{
    FileMap, MergeEngine, MergePlan, MergedPack, NoProgress, PackMetadata, Phase, Progress,
    SourcePack, merge,
};
