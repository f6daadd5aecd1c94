use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Content of one path in the merged pack and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFile {
    pub data: Vec<u8>,
    /// Input index of the pack that supplied `data`
    pub source: usize,
    /// Input indices of earlier packs whose copy was replaced, ascending
    pub overridden: Vec<usize>,
}

/// Path to content mapping built from all input packs.
///
/// Every insert is tagged with its input index and the highest index wins,
/// so the result is the same whatever order the inserts arrive in.
/// Iteration is in path order.
#[derive(Debug, Default)]
pub struct FileMap {
    files: BTreeMap<String, MappedFile>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `data` for `path` from input `source`.
    ///
    /// Returns the index of the pack that lost the path, if there was a conflict.
    pub fn insert(&mut self, path: String, source: usize, data: Vec<u8>) -> Option<usize> {
        match self.files.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(MappedFile {
                    data,
                    source,
                    overridden: Vec::new(),
                });
                None
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                if source >= current.source {
                    let loser = current.source;
                    // A pack listing the same path twice overrides itself
                    if loser != source {
                        insert_sorted(&mut current.overridden, loser);
                    }
                    current.source = source;
                    current.data = data;
                    Some(loser)
                } else {
                    insert_sorted(&mut current.overridden, source);
                    Some(source)
                }
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&MappedFile> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of paths supplied by more than one pack
    pub fn conflict_count(&self) -> usize {
        self.files.values().filter(|f| !f.overridden.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappedFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }
}

fn insert_sorted(indices: &mut Vec<usize>, index: usize) {
    if let Err(pos) = indices.binary_search(&index) {
        indices.insert(pos, index);
    }
}
