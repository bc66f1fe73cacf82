pub mod config;
pub mod engine;
pub mod error;
pub mod names;
pub mod normalize;
pub mod pool;
pub mod search;
pub mod store;
pub mod subgraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dijkstra,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Bfs
    }
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dijkstra => "dijkstra",
        }
    }
}

impl From<&str> for Algorithm {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dijkstra" => Algorithm::Dijkstra,
            _ => Algorithm::Bfs,
        }
    }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self {
        Algorithm::from(s.as_str())
    }
}

// Re-export commonly used items
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use names::NameIndex;
pub use normalize::clean_name;
pub use pool::SearchPool;
pub use search::{CancelFlag, SearchOptions, MAX_RELATIONS_CAP};
pub use store::{ArtistInfo, Direction, GraphStore};
pub use subgraph::{
    ExploreOutcome, ExploreResult, PathNode, PathOutcome, PathResult, SearchStats, Subgraph,
    SubgraphEdge, SubgraphNode,
};
