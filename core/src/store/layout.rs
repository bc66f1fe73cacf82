//! On-disk layout constants and record decoding.
//!
//! All integers are little-endian. The metadata file is a 12-byte header,
//! a fixed-stride table of 44-byte artist records sorted by id, then a
//! string arena running to end-of-file. Graph files are concatenations of
//! adjacency blocks: `count: u32` followed by `count` entries of
//! `(id: 16 bytes, similarity: f32)` sorted by similarity descending.

use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

pub const MAGIC: [u8; 4] = *b"SPTH";
pub const VERSION: u32 = 1;

pub const HEADER_LEN: usize = 12;
pub const RECORD_LEN: usize = 44;
pub const NEIGHBOR_LEN: usize = 20;
pub const BLOCK_COUNT_LEN: usize = 4;

/// One row of the metadata table. Offsets into the graph files land on the
/// `count` field of this artist's adjacency block; string offsets are
/// relative to the arena start.
#[derive(Debug, Clone, Copy)]
pub struct ArtistRecord {
    pub id: Uuid,
    pub forward_offset: u64,
    pub reverse_offset: u64,
    pub name_offset: u32,
    pub name_len: u16,
    pub url_offset: u32,
    pub url_len: u16,
}

/// Decodes one metadata record. `buf` must be exactly `RECORD_LEN` bytes;
/// callers slice it out of the bounds-checked record table.
pub fn decode_record(buf: &[u8]) -> ArtistRecord {
    debug_assert_eq!(buf.len(), RECORD_LEN);
    let mut id = [0u8; 16];
    id.copy_from_slice(&buf[..16]);

    ArtistRecord {
        id: Uuid::from_bytes(id),
        forward_offset: LittleEndian::read_u64(&buf[16..24]),
        reverse_offset: LittleEndian::read_u64(&buf[24..32]),
        name_offset: LittleEndian::read_u32(&buf[32..36]),
        name_len: LittleEndian::read_u16(&buf[36..38]),
        url_offset: LittleEndian::read_u32(&buf[38..42]),
        url_len: LittleEndian::read_u16(&buf[42..44]),
    }
}

/// Reads the id column of a record without decoding the rest; used by the
/// binary search over the table.
pub fn record_id(buf: &[u8]) -> &[u8] {
    &buf[..16]
}

pub struct Header {
    pub version: u32,
    pub artist_count: u32,
}

/// Decodes the metadata header. Returns `None` when the magic does not
/// match; length and version checks are the caller's.
pub fn decode_header(buf: &[u8]) -> Option<Header> {
    debug_assert!(buf.len() >= HEADER_LEN);
    if buf[..4] != MAGIC {
        return None;
    }
    Some(Header {
        version: LittleEndian::read_u32(&buf[4..8]),
        artist_count: LittleEndian::read_u32(&buf[8..12]),
    })
}
