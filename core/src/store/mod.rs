pub mod layout;
pub mod neighbors;

use std::fs::File;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use layout::{ArtistRecord, BLOCK_COUNT_LEN, HEADER_LEN, NEIGHBOR_LEN, RECORD_LEN, VERSION};
use neighbors::Neighbors;

pub const GRAPH_FILE: &str = "graph.bin";
pub const REVERSE_GRAPH_FILE: &str = "rev-graph.bin";
pub const METADATA_FILE: &str = "metadata.bin";

/// Which adjacency file a scan walks. Forward blocks list the artists this
/// artist points to; reverse blocks list the artists pointing to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Display view of one artist, resolved through the string arena.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistInfo {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

/// Random-access reader over the three memory-mapped files. Opened once at
/// startup and shared immutably between search workers for the process
/// lifetime; concurrent reads need no locks.
pub struct GraphStore {
    metadata: Mmap,
    forward: Mmap,
    reverse: Mmap,
    artist_count: usize,
    arena_base: usize,
}

impl GraphStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let metadata = map_file(&data_dir.join(METADATA_FILE))?;
        let forward = map_file(&data_dir.join(GRAPH_FILE))?;
        let reverse = map_file(&data_dir.join(REVERSE_GRAPH_FILE))?;

        if metadata.len() < HEADER_LEN {
            return Err(corrupt(METADATA_FILE, 0, "file shorter than header"));
        }
        let header = layout::decode_header(&metadata)
            .ok_or_else(|| corrupt(METADATA_FILE, 0, "bad magic"))?;
        if header.version != VERSION {
            return Err(corrupt(METADATA_FILE, 4, "unsupported version"));
        }

        let artist_count = header.artist_count as usize;
        let table_len = artist_count
            .checked_mul(RECORD_LEN)
            .ok_or_else(|| corrupt(METADATA_FILE, 8, "record count overflows"))?;
        let arena_base = HEADER_LEN + table_len;
        if arena_base > metadata.len() {
            return Err(corrupt(
                METADATA_FILE,
                HEADER_LEN as u64,
                "record table overruns file",
            ));
        }

        tracing::debug!(
            artists = artist_count,
            metadata_bytes = metadata.len(),
            forward_bytes = forward.len(),
            reverse_bytes = reverse.len(),
            "graph store mapped"
        );

        Ok(Self {
            metadata,
            forward,
            reverse,
            artist_count,
            arena_base,
        })
    }

    pub fn artist_count(&self) -> usize {
        self.artist_count
    }

    /// Binary search over the id-sorted record table.
    pub fn find(&self, id: Uuid) -> Option<usize> {
        let target = id.as_bytes().as_slice();
        let mut lo = 0usize;
        let mut hi = self.artist_count;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match layout::record_id(self.record_bytes(mid)).cmp(target) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Decodes the record at `index`. Indices come from `find` or from
    /// iteration over `0..artist_count`; passing anything else is a bug.
    pub fn record(&self, index: usize) -> ArtistRecord {
        layout::decode_record(self.record_bytes(index))
    }

    pub fn records(&self) -> impl Iterator<Item = ArtistRecord> + '_ {
        (0..self.artist_count).map(|index| self.record(index))
    }

    pub fn name<'a>(&'a self, record: &ArtistRecord) -> Result<&'a str> {
        self.arena_str(record.name_offset, record.name_len)
    }

    pub fn url<'a>(&'a self, record: &ArtistRecord) -> Result<&'a str> {
        self.arena_str(record.url_offset, record.url_len)
    }

    pub fn artist(&self, index: usize) -> Result<ArtistInfo> {
        let record = self.record(index);
        Ok(ArtistInfo {
            id: record.id,
            name: self.name(&record)?.to_owned(),
            url: self.url(&record)?.to_owned(),
        })
    }

    pub fn artist_by_id(&self, id: Uuid) -> Result<ArtistInfo> {
        let index = self.find(id).ok_or(EngineError::UnknownArtist(id))?;
        self.artist(index)
    }

    /// Lazy scan over one adjacency block. Block bounds are validated here;
    /// the returned iterator cannot read past them.
    pub fn neighbors(
        &self,
        record: &ArtistRecord,
        direction: Direction,
        min_similarity: f32,
        max_relations: usize,
    ) -> Result<Neighbors<'_>> {
        let (data, offset, file) = match direction {
            Direction::Forward => (&self.forward, record.forward_offset, GRAPH_FILE),
            Direction::Reverse => (&self.reverse, record.reverse_offset, REVERSE_GRAPH_FILE),
        };

        let start = offset as usize;
        let payload_start = start
            .checked_add(BLOCK_COUNT_LEN)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| corrupt(file, offset, "block offset out of bounds"))?;
        let count = LittleEndian::read_u32(&data[start..payload_start]) as usize;
        let payload_len = count
            .checked_mul(NEIGHBOR_LEN)
            .ok_or_else(|| corrupt(file, offset, "entry count overflows"))?;
        let payload_end = payload_start
            .checked_add(payload_len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| corrupt(file, offset, "adjacency block overruns file"))?;

        Ok(Neighbors::new(
            &data[payload_start..payload_end],
            min_similarity,
            max_relations,
        ))
    }

    /// Adjacency scan addressed by id. Every id reachable through any block
    /// must have a metadata record; a miss here means the graph and the
    /// metadata disagree.
    pub(crate) fn neighbors_of(
        &self,
        id: Uuid,
        direction: Direction,
        min_similarity: f32,
        max_relations: usize,
    ) -> Result<Neighbors<'_>> {
        let index = self
            .find(id)
            .ok_or_else(|| corrupt(METADATA_FILE, 0, "graph references unknown artist"))?;
        let record = self.record(index);
        self.neighbors(&record, direction, min_similarity, max_relations)
    }

    fn record_bytes(&self, index: usize) -> &[u8] {
        let start = HEADER_LEN + index * RECORD_LEN;
        &self.metadata[start..start + RECORD_LEN]
    }

    fn arena_str(&self, offset: u32, len: u16) -> Result<&str> {
        let start = self.arena_base + offset as usize;
        let end = start + len as usize;
        if end > self.metadata.len() {
            return Err(corrupt(METADATA_FILE, start as u64, "string overruns arena"));
        }
        std::str::from_utf8(&self.metadata[start..end])
            .map_err(|_| corrupt(METADATA_FILE, start as u64, "invalid utf-8 in arena"))
    }
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;
    // The OS rejects zero-length mappings; reserve one byte so an edgeless
    // store still opens. Nothing addresses a graph file with no blocks.
    let mmap = unsafe { memmap2::MmapOptions::new().len(len.max(1)).map(&file)? };
    Ok(mmap)
}

fn corrupt(file: &'static str, offset: u64, detail: &'static str) -> EngineError {
    EngineError::CorruptStore {
        file,
        offset,
        detail,
    }
}
