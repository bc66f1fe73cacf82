pub mod bfs;
pub mod dijkstra;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Hard ceiling on the per-node fan-out cap.
pub const MAX_RELATIONS_CAP: usize = 250;

/// Per-call knobs. `None` fields fall back to the engine configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub min_similarity: Option<f32>,
    pub max_relations: Option<usize>,
    pub budget: Option<usize>,
    pub deadline: Option<Duration>,
    pub cancel: Option<CancelFlag>,
}

/// Cooperative cancellation handle. Clone it, hand one side to the search
/// call, flip the other from anywhere.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Validated, fully-resolved search parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchLimits {
    pub min_similarity: f32,
    pub max_relations: usize,
    pub budget: usize,
}

impl SearchLimits {
    /// Applies configured defaults and rejects out-of-range values before
    /// any file is touched.
    pub(crate) fn resolve(options: &SearchOptions, config: &EngineConfig) -> Result<Self> {
        let min_similarity = options
            .min_similarity
            .unwrap_or(config.default_min_similarity);
        let max_relations = options.max_relations.unwrap_or(config.default_max_relations);
        let budget = options.budget.unwrap_or(config.default_budget);

        if !min_similarity.is_finite() || !(0.0..=1.0).contains(&min_similarity) {
            return Err(EngineError::InvalidArgument(format!(
                "min_similarity must be within [0, 1], got {min_similarity}"
            )));
        }
        if max_relations < 1 || max_relations > MAX_RELATIONS_CAP {
            return Err(EngineError::InvalidArgument(format!(
                "max_relations must be within [1, {MAX_RELATIONS_CAP}], got {max_relations}"
            )));
        }
        if budget == 0 {
            return Err(EngineError::InvalidArgument(
                "budget must be positive".to_owned(),
            ));
        }

        Ok(Self {
            min_similarity,
            max_relations,
            budget,
        })
    }
}

/// Deadline and cancellation, checked at every node pop.
#[derive(Debug, Clone)]
pub(crate) struct Guard {
    deadline: Option<Instant>,
    cancel: Option<CancelFlag>,
}

impl Guard {
    pub(crate) fn new(deadline: Option<Duration>, cancel: Option<CancelFlag>) -> Self {
        Self {
            deadline: deadline.map(|limit| Instant::now() + limit),
            cancel,
        }
    }

    pub(crate) fn tripped(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.cancel
            .as_ref()
            .map(CancelFlag::is_cancelled)
            .unwrap_or(false)
    }
}

/// How a point-to-point search ended. Every step carries the similarity of
/// the edge arriving from the previous node (0.0 sentinel on the first).
#[derive(Debug, Clone)]
pub(crate) enum PathSearchEnd {
    Found(Vec<(Uuid, f32)>),
    Exhausted,
    OverBudget,
    Interrupted,
}

/// Raw outcome of a point-to-point search, before assembly.
#[derive(Debug)]
pub(crate) struct PathSearch {
    pub end: PathSearchEnd,
    pub visited: FxHashSet<Uuid>,
    pub edges_considered: usize,
}

/// Presentation mark attached to each discovered node.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeMark {
    /// BFS layer, 0 for the root.
    Layer(u32),
    /// Cost at which the weighted search finalized the node.
    Cost(f32),
}

/// Raw outcome of a single-source bounded exploration.
#[derive(Debug)]
pub(crate) struct Discovered {
    pub marks: FxHashMap<Uuid, NodeMark>,
    /// Distinct artists whose adjacency was read during discovery.
    pub expanded: usize,
    pub edges_considered: usize,
    pub interrupted: bool,
}
