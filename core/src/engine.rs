//! Engine façade: opens the store once, owns the name index and the search
//! worker pool, and exposes the query surface. Searches run start-to-finish
//! on a pool worker; name resolution, random selection and stats answer
//! inline on the caller's thread.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::names::NameIndex;
use crate::pool::SearchPool;
use crate::search::{bfs, dijkstra, Guard, SearchLimits, SearchOptions};
use crate::store::{ArtistInfo, Direction, GraphStore};
use crate::subgraph::{self, ExploreResult, PathResult};
use crate::Algorithm;

pub struct Engine {
    shared: Arc<Shared>,
    pool: SearchPool,
}

struct Shared {
    store: GraphStore,
    names: NameIndex,
    config: EngineConfig,
}

impl Engine {
    pub fn open(config: EngineConfig) -> Result<Self> {
        // The configured defaults are applied to every request that omits a
        // parameter; reject an unusable configuration up front.
        SearchLimits::resolve(&SearchOptions::default(), &config)?;
        if config.workers == 0 {
            return Err(EngineError::InvalidArgument(
                "workers must be positive".to_owned(),
            ));
        }

        let store = GraphStore::open(&config.data_dir)?;
        let names = NameIndex::build(&store)?;
        let pool = SearchPool::new(config.workers)?;

        tracing::info!(
            artists = store.artist_count(),
            workers = config.workers,
            data_dir = %config.data_dir.display(),
            "engine ready"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                names,
                config,
            }),
            pool,
        })
    }

    /// Point-to-point search. Budget exhaustion, cancellation and "no path"
    /// come back as outcomes on the result, never as errors.
    pub fn find_path(
        &self,
        from: Uuid,
        to: Uuid,
        algorithm: Algorithm,
        options: &SearchOptions,
    ) -> Result<PathResult> {
        let started = Instant::now();
        let limits = SearchLimits::resolve(options, &self.shared.config)?;
        let guard = self.guard(options);

        self.require(from)?;
        self.require(to)?;

        let shared = Arc::clone(&self.shared);
        let result = self.dispatch(move || {
            let raw = match algorithm {
                Algorithm::Bfs => bfs::find_path(&shared.store, from, to, limits, &guard)?,
                Algorithm::Dijkstra => {
                    dijkstra::find_path(&shared.store, from, to, limits, &guard)?
                }
            };
            subgraph::assemble_path(&shared.store, raw, limits, started)
        });

        if let Err(error) = &result {
            if error.is_fatal() {
                tracing::error!(%from, %to, %error, "path search failed");
            }
        }
        result
    }

    /// Bounded neighborhood over outgoing edges.
    pub fn explore_forward(
        &self,
        root: Uuid,
        algorithm: Algorithm,
        options: &SearchOptions,
    ) -> Result<ExploreResult> {
        self.explore(root, Direction::Forward, algorithm, options)
    }

    /// Bounded neighborhood over incoming edges. Emitted edges keep their
    /// natural `(source, target, similarity)` orientation.
    pub fn explore_reverse(
        &self,
        root: Uuid,
        algorithm: Algorithm,
        options: &SearchOptions,
    ) -> Result<ExploreResult> {
        self.explore(root, Direction::Reverse, algorithm, options)
    }

    fn explore(
        &self,
        root: Uuid,
        direction: Direction,
        algorithm: Algorithm,
        options: &SearchOptions,
    ) -> Result<ExploreResult> {
        let started = Instant::now();
        let limits = SearchLimits::resolve(options, &self.shared.config)?;
        let guard = self.guard(options);

        self.require(root)?;

        let shared = Arc::clone(&self.shared);
        let result = self.dispatch(move || {
            let discovered = match algorithm {
                Algorithm::Bfs => bfs::explore(&shared.store, root, direction, limits, &guard)?,
                Algorithm::Dijkstra => {
                    dijkstra::explore(&shared.store, root, direction, limits, &guard)?
                }
            };
            subgraph::assemble_explore(&shared.store, root, direction, discovered, limits, started)
        });

        if let Err(error) = &result {
            if error.is_fatal() {
                tracing::error!(%root, ?direction, %error, "exploration failed");
            }
        }
        result
    }

    /// Ranked substring lookup: exact matches first, then prefix, then other
    /// substring matches, ties in lexicographic name order.
    pub fn resolve_name(&self, query: &str, limit: usize) -> Result<Vec<ArtistInfo>> {
        self.shared
            .names
            .search_substring(query, limit)
            .into_iter()
            .map(|record| self.shared.store.artist(record as usize))
            .collect()
    }

    /// All artists whose normalized name equals the normalized query.
    pub fn resolve_exact(&self, name: &str) -> Result<Vec<ArtistInfo>> {
        self.shared
            .names
            .resolve_exact(name)
            .into_iter()
            .map(|record| self.shared.store.artist(record as usize))
            .collect()
    }

    /// Uniform pick across the record table; `None` only on an empty store.
    pub fn random_artist(&self) -> Result<Option<ArtistInfo>> {
        let count = self.shared.store.artist_count();
        if count == 0 {
            return Ok(None);
        }
        let index = rand::thread_rng().gen_range(0..count);
        self.shared.store.artist(index).map(Some)
    }

    pub fn artist_by_id(&self, id: Uuid) -> Result<ArtistInfo> {
        self.shared.store.artist_by_id(id)
    }

    pub fn artist_count(&self) -> usize {
        self.shared.store.artist_count()
    }

    fn require(&self, id: Uuid) -> Result<()> {
        self.shared
            .store
            .find(id)
            .map(|_| ())
            .ok_or(EngineError::UnknownArtist(id))
    }

    fn guard(&self, options: &SearchOptions) -> Guard {
        Guard::new(
            options.deadline.or(self.shared.config.request_deadline),
            options.cancel.clone(),
        )
    }

    fn dispatch<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        self.pool.execute(Box::new(move || {
            let _ = sender.send(job());
        }));
        receiver
            .recv()
            .map_err(|_| EngineError::Io(std::io::Error::other("search worker disconnected")))?
    }
}
