//! In-memory name lookup, built once at startup from the metadata file.
//!
//! Exact resolution goes through a hash map keyed by normalized name. The
//! substring path runs on a trigram inverted index so an 850k-name store
//! answers well under a second; queries shorter than one trigram fall back
//! to a scan of the sorted name table.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::normalize::clean_name;
use crate::store::GraphStore;

const TRIGRAM_LEN: usize = 3;

pub struct NameIndex {
    exact: FxHashMap<String, Vec<u32>>,
    /// `(normalized_name, record_index)`, sorted — ascending position is
    /// lexicographic name order, which the ranking relies on.
    ordered: Vec<(String, u32)>,
    /// Trigram -> ascending positions into `ordered`.
    trigrams: FxHashMap<[u8; TRIGRAM_LEN], Vec<u32>>,
}

impl NameIndex {
    pub fn build(store: &GraphStore) -> Result<Self> {
        let mut exact: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut ordered = Vec::with_capacity(store.artist_count());

        for index in 0..store.artist_count() {
            let record = store.record(index);
            let normalized = clean_name(store.name(&record)?);
            exact
                .entry(normalized.clone())
                .or_default()
                .push(index as u32);
            ordered.push((normalized, index as u32));
        }
        ordered.sort_unstable();

        let mut trigrams: FxHashMap<[u8; TRIGRAM_LEN], Vec<u32>> = FxHashMap::default();
        for (position, (name, _)) in ordered.iter().enumerate() {
            for window in name.as_bytes().windows(TRIGRAM_LEN) {
                let mut gram = [0u8; TRIGRAM_LEN];
                gram.copy_from_slice(window);
                let posting = trigrams.entry(gram).or_default();
                // Positions arrive ascending; repeated trigrams within one
                // name would otherwise duplicate the tail entry.
                if posting.last() != Some(&(position as u32)) {
                    posting.push(position as u32);
                }
            }
        }

        Ok(Self {
            exact,
            ordered,
            trigrams,
        })
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Record indices of every artist whose normalized name matches the
    /// normalized query. Shared names return all holders.
    pub fn resolve_exact(&self, name: &str) -> Vec<u32> {
        self.exact
            .get(&clean_name(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Up to `limit` record indices whose name contains the query, ranked
    /// exact match first, then prefix match, then other substring match,
    /// ties in lexicographic name order.
    pub fn search_substring(&self, query: &str, limit: usize) -> Vec<u32> {
        let query = clean_name(query);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let positions = if query.len() >= TRIGRAM_LEN {
            self.trigram_candidates(&query)
        } else {
            (0..self.ordered.len() as u32).collect()
        };

        let mut exact = Vec::new();
        let mut prefix = Vec::new();
        let mut inner = Vec::new();
        for position in positions {
            let (name, record) = &self.ordered[position as usize];
            if name == &query {
                exact.push(*record);
            } else if name.starts_with(&query) {
                prefix.push(*record);
            } else if name.contains(&query) {
                inner.push(*record);
            }
        }

        let mut ranked = exact;
        ranked.extend(prefix);
        ranked.extend(inner);
        ranked.truncate(limit);
        ranked
    }

    /// Intersects the posting lists of the query's trigrams, rarest first.
    /// Candidates still need a verifying `contains` pass: shared trigrams do
    /// not imply a contiguous match.
    fn trigram_candidates(&self, query: &str) -> Vec<u32> {
        let mut lists: Vec<&Vec<u32>> = Vec::new();
        for window in query.as_bytes().windows(TRIGRAM_LEN) {
            let mut gram = [0u8; TRIGRAM_LEN];
            gram.copy_from_slice(window);
            match self.trigrams.get(&gram) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        lists.sort_unstable_by_key(|list| list.len());

        let mut candidates = lists[0].clone();
        for list in &lists[1..] {
            candidates.retain(|position| list.binary_search(position).is_ok());
            if candidates.is_empty() {
                break;
            }
        }
        candidates
    }
}
