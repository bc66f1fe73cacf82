//! Weighted search: a path's cost is the sum of `-ln(similarity)` over its
//! edges, so the cheapest path maximizes the product of similarities.
//! Ties break on fewer hops, then lexicographic artist id.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use super::{Discovered, Guard, NodeMark, PathSearch, PathSearchEnd, SearchLimits};
use crate::error::Result;
use crate::store::{Direction, GraphStore};

#[derive(Clone, Copy)]
struct QueueEntry {
    cost: f64,
    hops: u32,
    artist: Uuid,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on every key: BinaryHeap is a max-heap and we pop the
        // cheapest entry first. NaN compares as Equal rather than poisoning
        // the heap order.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.artist.cmp(&self.artist))
    }
}

fn edge_cost(similarity: f32) -> f64 {
    -f64::from(similarity).ln()
}

/// Relaxation out of the cheapest popped node until the target itself is
/// popped; the first pop of the target is optimal. `budget` caps distinct
/// popped nodes.
pub(crate) fn find_path(
    store: &GraphStore,
    from: Uuid,
    to: Uuid,
    limits: SearchLimits,
    guard: &Guard,
) -> Result<PathSearch> {
    let mut heap = BinaryHeap::new();
    let mut best: FxHashMap<Uuid, (f64, u32)> = FxHashMap::default();
    let mut parent: FxHashMap<Uuid, (Uuid, f32)> = FxHashMap::default();
    let mut settled: FxHashSet<Uuid> = FxHashSet::default();
    let mut edges_considered = 0usize;

    heap.push(QueueEntry {
        cost: 0.0,
        hops: 0,
        artist: from,
    });
    best.insert(from, (0.0, 0));

    while let Some(entry) = heap.pop() {
        if settled.contains(&entry.artist) {
            continue;
        }
        if guard.tripped() {
            return Ok(PathSearch {
                end: PathSearchEnd::Interrupted,
                visited: settled,
                edges_considered,
            });
        }
        if settled.len() >= limits.budget {
            return Ok(PathSearch {
                end: PathSearchEnd::OverBudget,
                visited: settled,
                edges_considered,
            });
        }
        if entry.artist == to {
            settled.insert(entry.artist);
            let steps = reconstruct(&parent, from, to);
            return Ok(PathSearch {
                end: PathSearchEnd::Found(steps),
                visited: settled,
                edges_considered,
            });
        }
        settled.insert(entry.artist);

        let neighbors = store.neighbors_of(
            entry.artist,
            Direction::Forward,
            limits.min_similarity,
            limits.max_relations,
        )?;
        for (neighbor, similarity) in neighbors {
            edges_considered += 1;
            if similarity <= 0.0 {
                // Sorted descending, so the rest of the block is zero too;
                // zero-similarity edges have no finite cost.
                break;
            }
            if settled.contains(&neighbor) {
                continue;
            }
            let cost = entry.cost + edge_cost(similarity);
            let hops = entry.hops + 1;
            let improved = match best.get(&neighbor) {
                None => true,
                Some(&(best_cost, best_hops)) => {
                    cost < best_cost || (cost == best_cost && hops < best_hops)
                }
            };
            if improved {
                best.insert(neighbor, (cost, hops));
                parent.insert(neighbor, (entry.artist, similarity));
                heap.push(QueueEntry {
                    cost,
                    hops,
                    artist: neighbor,
                });
            }
        }
    }

    Ok(PathSearch {
        end: PathSearchEnd::Exhausted,
        visited: settled,
        edges_considered,
    })
}

fn reconstruct(
    parent: &FxHashMap<Uuid, (Uuid, f32)>,
    from: Uuid,
    to: Uuid,
) -> Vec<(Uuid, f32)> {
    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        match parent.get(&current) {
            Some(&(previous, similarity)) => {
                path.push((current, similarity));
                current = previous;
            }
            None => break,
        }
    }
    path.push((from, 0.0));
    path.reverse();
    path
}

/// Pops up to `budget` nodes in increasing cost order, recording the cost at
/// which each was finalized. Filling the budget is normal completion.
pub(crate) fn explore(
    store: &GraphStore,
    root: Uuid,
    direction: Direction,
    limits: SearchLimits,
    guard: &Guard,
) -> Result<Discovered> {
    let mut heap = BinaryHeap::new();
    let mut best: FxHashMap<Uuid, (f64, u32)> = FxHashMap::default();
    let mut marks: FxHashMap<Uuid, NodeMark> = FxHashMap::default();
    let mut expanded = 0usize;
    let mut edges_considered = 0usize;
    let mut interrupted = false;

    heap.push(QueueEntry {
        cost: 0.0,
        hops: 0,
        artist: root,
    });
    best.insert(root, (0.0, 0));

    while let Some(entry) = heap.pop() {
        if marks.contains_key(&entry.artist) {
            continue;
        }
        if guard.tripped() {
            interrupted = true;
            break;
        }
        if marks.len() >= limits.budget {
            break;
        }
        marks.insert(entry.artist, NodeMark::Cost(entry.cost as f32));
        expanded += 1;

        let neighbors = store.neighbors_of(
            entry.artist,
            direction,
            limits.min_similarity,
            limits.max_relations,
        )?;
        for (neighbor, similarity) in neighbors {
            edges_considered += 1;
            if similarity <= 0.0 {
                break;
            }
            if marks.contains_key(&neighbor) {
                continue;
            }
            let cost = entry.cost + edge_cost(similarity);
            let hops = entry.hops + 1;
            let improved = match best.get(&neighbor) {
                None => true,
                Some(&(best_cost, best_hops)) => {
                    cost < best_cost || (cost == best_cost && hops < best_hops)
                }
            };
            if improved {
                best.insert(neighbor, (cost, hops));
                heap.push(QueueEntry {
                    cost,
                    hops,
                    artist: neighbor,
                });
            }
        }
    }

    Ok(Discovered {
        marks,
        expanded,
        edges_considered,
        interrupted,
    })
}
