use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

use super::layout::NEIGHBOR_LEN;

/// Lazy walk over one adjacency block, yielding `(neighbor_id, similarity)`
/// straight off the mapping. Entries are stored by similarity descending, so
/// the first entry below the floor ends the block for good. Cheap to abandon
/// mid-way; allocates nothing beyond the yielded pair.
pub struct Neighbors<'a> {
    entries: &'a [u8],
    min_similarity: f32,
    max_relations: usize,
    yielded: usize,
}

impl<'a> Neighbors<'a> {
    /// `entries` is the block payload (after the count field), already
    /// bounds-checked against the mapping by the store.
    pub(crate) fn new(entries: &'a [u8], min_similarity: f32, max_relations: usize) -> Self {
        Self {
            entries,
            min_similarity,
            max_relations,
            yielded: 0,
        }
    }
}

impl Iterator for Neighbors<'_> {
    type Item = (Uuid, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.entries.len() < NEIGHBOR_LEN || self.yielded >= self.max_relations {
            return None;
        }

        let similarity = LittleEndian::read_f32(&self.entries[16..20]);
        if similarity < self.min_similarity {
            // Sorted descending: everything after this entry is below the
            // floor as well.
            self.entries = &[];
            return None;
        }

        let mut id = [0u8; 16];
        id.copy_from_slice(&self.entries[..16]);
        self.entries = &self.entries[NEIGHBOR_LEN..];
        self.yielded += 1;

        Some((Uuid::from_bytes(id), similarity))
    }
}
