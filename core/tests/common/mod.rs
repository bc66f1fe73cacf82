//! Shared test fixture: writes the three store files into a temp directory
//! from an edge list, deriving block offsets, the reverse transpose, and the
//! id-sorted metadata table with its string arena.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

use soundpath_core::{Engine, EngineConfig, GraphStore};

pub struct FixtureBuilder {
    artists: Vec<(String, Vec<(String, f32)>)>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            artists: Vec::new(),
        }
    }

    pub fn artist(mut self, name: &str, edges: &[(&str, f32)]) -> Self {
        self.artists.push((
            name.to_owned(),
            edges
                .iter()
                .map(|&(target, similarity)| (target.to_owned(), similarity))
                .collect(),
        ));
        self
    }

    pub fn build(self) -> GraphFixture {
        let count = self.artists.len();
        // Sequential ids: `from_u128` is big-endian, so insertion order is
        // already the id-sorted order the metadata table requires.
        let ids: Vec<Uuid> = (0..count).map(|i| Uuid::from_u128(i as u128 + 1)).collect();
        let index_of = |name: &str| -> usize {
            self.artists
                .iter()
                .position(|(candidate, _)| candidate == name)
                .unwrap_or_else(|| panic!("edge target '{name}' not declared"))
        };

        let mut forward: Vec<Vec<(usize, f32)>> = Vec::with_capacity(count);
        for (_, edges) in &self.artists {
            let mut list: Vec<(usize, f32)> = edges
                .iter()
                .map(|(target, similarity)| (index_of(target), *similarity))
                .collect();
            sort_block(&mut list);
            forward.push(list);
        }

        let mut reverse: Vec<Vec<(usize, f32)>> = vec![Vec::new(); count];
        for (source, edges) in forward.iter().enumerate() {
            for &(target, similarity) in edges {
                reverse[target].push((source, similarity));
            }
        }
        for list in &mut reverse {
            sort_block(list);
        }

        let dir = TempDir::new().unwrap();
        let forward_offsets = write_graph_file(&dir.path().join("graph.bin"), &forward, &ids);
        let reverse_offsets = write_graph_file(&dir.path().join("rev-graph.bin"), &reverse, &ids);

        let names: Vec<String> = self.artists.into_iter().map(|(name, _)| name).collect();
        write_metadata_file(
            &dir.path().join("metadata.bin"),
            &ids,
            &names,
            &forward_offsets,
            &reverse_offsets,
        );

        GraphFixture { dir, ids, names }
    }
}

fn sort_block(list: &mut [(usize, f32)]) {
    // Similarity descending; equal similarities by ascending target id to
    // keep fixtures deterministic.
    list.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
}

fn write_graph_file(path: &Path, lists: &[Vec<(usize, f32)>], ids: &[Uuid]) -> Vec<u64> {
    let mut buf = Vec::new();
    let mut offsets = Vec::with_capacity(lists.len());
    for list in lists {
        offsets.push(buf.len() as u64);
        buf.write_u32::<LittleEndian>(list.len() as u32).unwrap();
        for &(target, similarity) in list {
            buf.write_all(ids[target].as_bytes()).unwrap();
            buf.write_f32::<LittleEndian>(similarity).unwrap();
        }
    }
    std::fs::write(path, &buf).unwrap();
    offsets
}

fn write_metadata_file(
    path: &Path,
    ids: &[Uuid],
    names: &[String],
    forward_offsets: &[u64],
    reverse_offsets: &[u64],
) {
    let mut arena: Vec<u8> = Vec::new();
    let mut buf = Vec::new();

    buf.write_all(b"SPTH").unwrap();
    buf.write_u32::<LittleEndian>(1).unwrap();
    buf.write_u32::<LittleEndian>(ids.len() as u32).unwrap();

    for (index, id) in ids.iter().enumerate() {
        let url = fixture_url(&names[index]);
        let name_offset = arena.len() as u32;
        arena.extend_from_slice(names[index].as_bytes());
        let url_offset = arena.len() as u32;
        arena.extend_from_slice(url.as_bytes());

        buf.write_all(id.as_bytes()).unwrap();
        buf.write_u64::<LittleEndian>(forward_offsets[index]).unwrap();
        buf.write_u64::<LittleEndian>(reverse_offsets[index]).unwrap();
        buf.write_u32::<LittleEndian>(name_offset).unwrap();
        buf.write_u16::<LittleEndian>(names[index].len() as u16).unwrap();
        buf.write_u32::<LittleEndian>(url_offset).unwrap();
        buf.write_u16::<LittleEndian>(url.len() as u16).unwrap();
    }

    buf.extend_from_slice(&arena);
    std::fs::write(path, &buf).unwrap();
}

pub fn fixture_url(name: &str) -> String {
    format!("https://www.last.fm/music/{}", name.replace(' ', "+"))
}

pub struct GraphFixture {
    pub dir: TempDir,
    ids: Vec<Uuid>,
    names: Vec<String>,
}

impl GraphFixture {
    pub fn id(&self, name: &str) -> Uuid {
        let index = self
            .names
            .iter()
            .position(|candidate| candidate == name)
            .unwrap_or_else(|| panic!("no fixture artist named '{name}'"));
        self.ids[index]
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            workers: 2,
            ..EngineConfig::with_data_dir(self.dir.path())
        }
    }

    pub fn engine(&self) -> Engine {
        Engine::open(self.config()).unwrap()
    }

    pub fn store(&self) -> GraphStore {
        GraphStore::open(self.dir.path()).unwrap()
    }
}

/// The six-artist graph used across the search suites:
/// A→B(0.9), A→C(0.4), B→D(0.8), C→D(0.5), D→E(0.9), E→F(0.1), F→A(0.2).
pub fn six_artists() -> GraphFixture {
    FixtureBuilder::new()
        .artist("Arcade Fire", &[("Beach House", 0.9), ("Caribou", 0.4)])
        .artist("Beach House", &[("Deerhunter", 0.8)])
        .artist("Caribou", &[("Deerhunter", 0.5)])
        .artist("Deerhunter", &[("Efterklang", 0.9)])
        .artist("Efterklang", &[("Fleet Foxes", 0.1)])
        .artist("Fleet Foxes", &[("Arcade Fire", 0.2)])
        .build()
}

pub fn unknown_id() -> Uuid {
    Uuid::from_u128(u128::MAX)
}
