//! Unweighted search: bidirectional point-to-point BFS and layered
//! single-source exploration.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use super::{Discovered, Guard, NodeMark, PathSearch, PathSearchEnd, SearchLimits};
use crate::error::Result;
use crate::store::{Direction, GraphStore};

struct Frontier {
    root: Uuid,
    direction: Direction,
    queue: VecDeque<Uuid>,
    visited: FxHashSet<Uuid>,
    parent: FxHashMap<Uuid, (Uuid, f32)>,
}

impl Frontier {
    fn new(root: Uuid, direction: Direction) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);
        Self {
            root,
            direction,
            queue,
            visited: FxHashSet::default(),
            parent: FxHashMap::default(),
        }
    }
}

enum Step {
    Continue,
    Met(Uuid),
    OverBudget,
}

/// Bidirectional BFS. The source side walks the forward graph, the target
/// side the reverse graph, so a spliced path always reads `a -> b` as
/// "a lists b as similar". Each round expands the side with the smaller
/// frontier; the search meets when a popped node already has a predecessor
/// on (or is the root of) the opposite side.
pub(crate) fn find_path(
    store: &GraphStore,
    from: Uuid,
    to: Uuid,
    limits: SearchLimits,
    guard: &Guard,
) -> Result<PathSearch> {
    let mut visited: FxHashSet<Uuid> = FxHashSet::default();
    let mut edges_considered = 0usize;

    if from == to {
        visited.insert(from);
        return Ok(PathSearch {
            end: PathSearchEnd::Found(vec![(from, 0.0)]),
            visited,
            edges_considered,
        });
    }

    let mut source = Frontier::new(from, Direction::Forward);
    let mut target = Frontier::new(to, Direction::Reverse);

    while !source.queue.is_empty() || !target.queue.is_empty() {
        if guard.tripped() {
            return Ok(PathSearch {
                end: PathSearchEnd::Interrupted,
                visited,
                edges_considered,
            });
        }

        let expand_source = if target.queue.is_empty() {
            true
        } else if source.queue.is_empty() {
            false
        } else {
            source.queue.len() <= target.queue.len()
        };

        let step = if expand_source {
            expand(
                store,
                &mut source,
                &target,
                &limits,
                &mut visited,
                &mut edges_considered,
            )?
        } else {
            expand(
                store,
                &mut target,
                &source,
                &limits,
                &mut visited,
                &mut edges_considered,
            )?
        };

        match step {
            Step::Continue => {}
            Step::Met(meeting) => {
                return Ok(PathSearch {
                    end: PathSearchEnd::Found(splice(&source, &target, meeting)),
                    visited,
                    edges_considered,
                });
            }
            Step::OverBudget => {
                return Ok(PathSearch {
                    end: PathSearchEnd::OverBudget,
                    visited,
                    edges_considered,
                });
            }
        }
    }

    Ok(PathSearch {
        end: PathSearchEnd::Exhausted,
        visited,
        edges_considered,
    })
}

fn expand(
    store: &GraphStore,
    side: &mut Frontier,
    other: &Frontier,
    limits: &SearchLimits,
    visited: &mut FxHashSet<Uuid>,
    edges_considered: &mut usize,
) -> Result<Step> {
    let Some(current) = side.queue.pop_front() else {
        return Ok(Step::Continue);
    };
    if side.visited.contains(&current) {
        return Ok(Step::Continue);
    }

    // The pop that would admit a (budget + 1)-th distinct artist aborts.
    if !visited.contains(&current) && visited.len() >= limits.budget {
        return Ok(Step::OverBudget);
    }
    visited.insert(current);
    side.visited.insert(current);

    if other.parent.contains_key(&current) || current == other.root {
        return Ok(Step::Met(current));
    }

    let neighbors = store.neighbors_of(
        current,
        side.direction,
        limits.min_similarity,
        limits.max_relations,
    )?;
    for (neighbor, similarity) in neighbors {
        *edges_considered += 1;
        if side.visited.contains(&neighbor) || side.parent.contains_key(&neighbor) {
            continue;
        }
        side.parent.insert(neighbor, (current, similarity));
        side.queue.push_back(neighbor);
    }

    Ok(Step::Continue)
}

/// Joins the two half-paths at the meeting node. The source half is walked
/// back to the source root and reversed; the target half follows reverse
/// predecessors, each of which is one forward hop closer to the target.
fn splice(source: &Frontier, target: &Frontier, meeting: Uuid) -> Vec<(Uuid, f32)> {
    let mut path = Vec::new();
    let mut current = meeting;
    while current != source.root {
        match source.parent.get(&current) {
            Some(&(previous, similarity)) => {
                path.push((current, similarity));
                current = previous;
            }
            None => break,
        }
    }
    path.push((source.root, 0.0));
    path.reverse();

    let mut current = meeting;
    while current != target.root {
        match target.parent.get(&current) {
            Some(&(next, similarity)) => {
                path.push((next, similarity));
                current = next;
            }
            None => break,
        }
    }

    path
}

/// Layer-by-layer discovery from one root, stopping once `budget` distinct
/// artists are in the result. The induced subgraph over the discovered set
/// is the caller's job.
pub(crate) fn explore(
    store: &GraphStore,
    root: Uuid,
    direction: Direction,
    limits: SearchLimits,
    guard: &Guard,
) -> Result<Discovered> {
    let mut marks: FxHashMap<Uuid, NodeMark> = FxHashMap::default();
    let mut queue: VecDeque<(Uuid, u32)> = VecDeque::new();
    let mut expanded = 0usize;
    let mut edges_considered = 0usize;
    let mut interrupted = false;

    marks.insert(root, NodeMark::Layer(0));
    queue.push_back((root, 0));

    while marks.len() < limits.budget {
        let Some((current, layer)) = queue.pop_front() else {
            break;
        };
        if guard.tripped() {
            interrupted = true;
            break;
        }
        expanded += 1;

        let neighbors = store.neighbors_of(
            current,
            direction,
            limits.min_similarity,
            limits.max_relations,
        )?;
        for (neighbor, _) in neighbors {
            edges_considered += 1;
            if marks.len() >= limits.budget {
                break;
            }
            if !marks.contains_key(&neighbor) {
                marks.insert(neighbor, NodeMark::Layer(layer + 1));
                queue.push_back((neighbor, layer + 1));
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
