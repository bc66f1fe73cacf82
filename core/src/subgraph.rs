//! Turns raw search state into caller-facing results: hop-ordered paths,
//! induced subgraphs over the visited set, and visit statistics, with every
//! node enriched with its display name and URL.

use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::search::{Discovered, NodeMark, PathSearch, PathSearchEnd, SearchLimits};
use crate::store::{ArtistInfo, Direction, GraphStore};

#[derive(Debug, Clone, Serialize)]
pub struct PathNode {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    /// Similarity of the edge from the previous node; absent on the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubgraphNode {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    /// BFS layer, 0 for the exploration root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<u32>,
    /// Cost at which the weighted exploration finalized this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f32>,
}

/// Always emitted in natural orientation: `from` lists `to` as similar.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SubgraphEdge {
    pub from: Uuid,
    pub to: Uuid,
    pub similarity: f32,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Subgraph {
    pub nodes: Vec<SubgraphNode>,
    pub edges: Vec<SubgraphEdge>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchStats {
    pub duration_ms: u64,
    pub artists_visited: usize,
    pub edges_considered: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathOutcome {
    Found,
    NotFound,
    BudgetExhausted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExploreOutcome {
    Complete,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathResult {
    pub outcome: PathOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathNode>>,
    pub subgraph: Subgraph,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreResult {
    pub root: ArtistInfo,
    pub outcome: ExploreOutcome,
    pub subgraph: Subgraph,
    pub stats: SearchStats,
}

pub(crate) fn assemble_path(
    store: &GraphStore,
    raw: PathSearch,
    limits: SearchLimits,
    started: Instant,
) -> Result<PathResult> {
    let (outcome, steps) = match raw.end {
        PathSearchEnd::Found(steps) => (PathOutcome::Found, Some(steps)),
        PathSearchEnd::Exhausted => (PathOutcome::NotFound, None),
        PathSearchEnd::OverBudget => (PathOutcome::BudgetExhausted, None),
        PathSearchEnd::Interrupted => (PathOutcome::Cancelled, None),
    };

    let path = match steps {
        Some(steps) => Some(path_nodes(store, &steps)?),
        None => None,
    };

    let mut nodes = Vec::with_capacity(raw.visited.len());
    for id in sorted(&raw.visited) {
        let info = store.artist_by_id(id)?;
        nodes.push(SubgraphNode {
            id,
            name: info.name,
            url: info.url,
            layer: None,
            cost: None,
        });
    }
    let edges = induced_edges(store, &raw.visited, Direction::Forward, limits)?;

    Ok(PathResult {
        outcome,
        path,
        subgraph: Subgraph { nodes, edges },
        stats: SearchStats {
            duration_ms: started.elapsed().as_millis() as u64,
            artists_visited: raw.visited.len(),
            edges_considered: raw.edges_considered,
        },
    })
}

pub(crate) fn assemble_explore(
    store: &GraphStore,
    root: Uuid,
    direction: Direction,
    discovered: Discovered,
    limits: SearchLimits,
    started: Instant,
) -> Result<ExploreResult> {
    let members: FxHashSet<Uuid> = discovered.marks.keys().copied().collect();

    let mut nodes = Vec::with_capacity(members.len());
    for id in sorted(&members) {
        let info = store.artist_by_id(id)?;
        let (layer, cost) = match discovered.marks[&id] {
            NodeMark::Layer(layer) => (Some(layer), None),
            NodeMark::Cost(cost) => (None, Some(cost)),
        };
        nodes.push(SubgraphNode {
            id,
            name: info.name,
            url: info.url,
            layer,
            cost,
        });
    }
    let edges = induced_edges(store, &members, direction, limits)?;

    Ok(ExploreResult {
        root: store.artist_by_id(root)?,
        outcome: if discovered.interrupted {
            ExploreOutcome::Cancelled
        } else {
            ExploreOutcome::Complete
        },
        subgraph: Subgraph { nodes, edges },
        stats: SearchStats {
            duration_ms: started.elapsed().as_millis() as u64,
            artists_visited: discovered.expanded,
            edges_considered: discovered.edges_considered,
        },
    })
}

fn path_nodes(store: &GraphStore, steps: &[(Uuid, f32)]) -> Result<Vec<PathNode>> {
    steps
        .iter()
        .enumerate()
        .map(|(index, &(id, similarity))| {
            let info = store.artist_by_id(id)?;
            Ok(PathNode {
                id,
                name: info.name,
                url: info.url,
                similarity: (index > 0).then_some(similarity),
            })
        })
        .collect()
}

/// All edges between member nodes that clear the similarity floor and sit
/// within the top `max_relations` of the scanned endpoint. Reverse scans
/// yield incoming edges, flipped back to natural orientation.
fn induced_edges(
    store: &GraphStore,
    members: &FxHashSet<Uuid>,
    direction: Direction,
    limits: SearchLimits,
) -> Result<Vec<SubgraphEdge>> {
    let mut edges = Vec::new();
    for scanned in sorted(members) {
        let neighbors = store.neighbors_of(
            scanned,
            direction,
            limits.min_similarity,
            limits.max_relations,
        )?;
        for (other, similarity) in neighbors {
            if other == scanned || !members.contains(&other) {
                continue;
            }
            let edge = match direction {
                Direction::Forward => SubgraphEdge {
                    from: scanned,
                    to: other,
                    similarity,
                },
                Direction::Reverse => SubgraphEdge {
                    from: other,
                    to: scanned,
                    similarity,
                },
            };
            edges.push(edge);
        }
    }
    Ok(edges)
}

fn sorted(members: &FxHashSet<Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = members.iter().copied().collect();
    ids.sort_unstable();
    ids
}
