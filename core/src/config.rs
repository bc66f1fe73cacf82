use std::path::PathBuf;
use std::time::Duration;

/// Everything the engine needs to open a data directory and answer queries.
/// Threaded into `Engine::open`; there are no ambient globals.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding `graph.bin`, `rev-graph.bin` and `metadata.bin`.
    pub data_dir: PathBuf,
    /// Similarity floor applied when a caller omits one.
    pub default_min_similarity: f32,
    /// Per-node fan-out cap applied when a caller omits one.
    pub default_max_relations: usize,
    /// Visit budget applied when a caller omits one.
    pub default_budget: usize,
    /// Number of search worker threads.
    pub workers: usize,
    /// Wall-clock cap per search; `None` means uncapped.
    pub request_deadline: Option<Duration>,
}

impl EngineConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Self {
            data_dir: PathBuf::from("data"),
            default_min_similarity: 0.0,
            default_max_relations: 80,
            default_budget: 100,
            workers,
            request_deadline: None,
        }
    }
}
