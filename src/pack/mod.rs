//! Resource pack merging.
//!
//! Packs are read in the order given and flattened into one
//! path-to-content map where the last pack to supply a path wins. The
//! merged archive gets a freshly written `pack.mcmeta` and, if the user
//! chose one, a `pack.png`; those two names are never copied from inputs.

mod file_map;
mod merge;
mod metadata;
mod progress;
mod source;

pub use file_map::{FileMap, MappedFile};
pub use merge::{MergeEngine, MergePlan, MergedPack, merge};
pub use metadata::*;
pub use progress::{NoProgress, Phase, Progress};
pub use source::{SourceArchive, SourcePack};
