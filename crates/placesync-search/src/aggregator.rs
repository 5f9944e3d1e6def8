//! Search pipeline orchestration.
//!
//! Keystrokes → [`Debouncer`] → one session per settled keyword → local and
//! public collections (synchronous) plus the external provider (awaited) →
//! [`merge`] → published [`SearchState`].
//!
//! Every session gets a fresh, higher generation. A settled session only
//! publishes if no newer session has started since, so the last keystroke
//! wins regardless of the order in which provider responses arrive. Nothing
//! is aborted; stale results are simply dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use placesync_core::{AppConfig, MergedResult, SearchSession, SearchableRecord};
use tokio::sync::watch;

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::error::ProviderError;
use crate::merge::merge;
use crate::recent::RecentQueries;
use crate::sources::{CollectionAdapter, ConfiguredProvider, ExternalAdapter, PlaceProvider};

/// The observable output of the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub results: Vec<MergedResult>,
    pub is_searching: bool,
    /// Advisory shown inline when the external provider failed. Local and
    /// public matches are still in `results`.
    pub error: Option<String>,
}

/// How a single call to [`SearchAggregator::search`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Results were published to observers.
    Published { generation: u64, count: usize },
    /// A newer session (or a clear) superseded this one; nothing published.
    Stale { generation: u64 },
    /// Blank keyword: results cleared without touching any source.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub debounce: Duration,
    pub recent_capacity: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            recent_capacity: 10,
        }
    }
}

impl AggregatorOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            recent_capacity: config.recent_queries_capacity,
        }
    }
}

pub struct SearchAggregator<P> {
    local: CollectionAdapter,
    public: CollectionAdapter,
    external: ExternalAdapter<P>,
    /// Only modified inside `state` sender closures, which serialises
    /// session starts, clears and publishes against each other.
    generation: AtomicU64,
    session: Mutex<Option<SearchSession>>,
    recent: Mutex<RecentQueries>,
    state: watch::Sender<SearchState>,
    debouncer: Debouncer,
}

impl SearchAggregator<ConfiguredProvider> {
    /// Build the pipeline with the provider selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the configured provider cannot be built.
    pub fn from_config(
        config: &AppConfig,
        local: Vec<SearchableRecord>,
        public: Vec<SearchableRecord>,
    ) -> Result<Self, ProviderError> {
        let provider = ConfiguredProvider::from_config(config)?;
        tracing::debug!(provider = provider.name(), "search pipeline configured");
        Ok(Self::new(
            CollectionAdapter::local(local),
            CollectionAdapter::public(public),
            provider,
            AggregatorOptions::from_config(config),
        ))
    }
}

impl<P: PlaceProvider> SearchAggregator<P> {
    pub fn new(
        local: CollectionAdapter,
        public: CollectionAdapter,
        provider: P,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            local,
            public,
            external: ExternalAdapter::new(provider),
            generation: AtomicU64::new(0),
            session: Mutex::new(None),
            recent: Mutex::new(RecentQueries::new(options.recent_capacity)),
            state: watch::Sender::new(SearchState::default()),
            debouncer: Debouncer::new(options.debounce),
        }
    }

    /// Run one search session for `keyword` and publish its merged results
    /// unless a newer session has started in the meantime.
    ///
    /// A blank keyword clears the results immediately and touches no source.
    pub async fn search(&self, keyword: &str) -> SessionOutcome {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.clear_search();
            return SessionOutcome::Cleared;
        }

        let session = self.begin_session(keyword);
        let generation = session.generation;
        tracing::debug!(keyword, generation, "search session started");

        let local = self.local.search(keyword);
        let public = self.public.search(keyword);
        let external = self.external.search(keyword).await;

        let results = merge(local, public, external.records);
        let count = results.len();
        let error = external.error;

        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *self.lock_session() = None;
            *state = SearchState {
                results,
                is_searching: false,
                error,
            };
            true
        });

        if published {
            tracing::debug!(keyword, generation, count, "search results published");
            SessionOutcome::Published { generation, count }
        } else {
            tracing::debug!(keyword, generation, "discarding stale search results");
            SessionOutcome::Stale { generation }
        }
    }

    /// Synchronously empty the results. Any session still in flight is
    /// invalidated and will not publish.
    pub fn clear_search(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *self.lock_session() = None;
            *state = SearchState::default();
        });
    }

    /// Stop the pipeline: drop any pending debounced keystroke and make sure
    /// nothing in flight publishes afterwards. Current results stay visible.
    pub fn teardown(&self) {
        self.debouncer.cancel();
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *self.lock_session() = None;
            state.is_searching = false;
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the currently published state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// The session still waiting on its sources, if any. Cleared once that
    /// session publishes or is invalidated by a clear or teardown.
    #[must_use]
    pub fn current_session(&self) -> Option<SearchSession> {
        self.lock_session().clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn recent_queries(&self) -> Vec<String> {
        self.lock_recent().entries()
    }

    /// Forget every recorded keyword. Published results are untouched.
    pub fn clear_recent(&self) {
        self.lock_recent().clear();
    }

    /// Quiet period applied to [`input`](Self::input).
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }

    pub fn local(&self) -> &CollectionAdapter {
        &self.local
    }

    pub fn public(&self) -> &CollectionAdapter {
        &self.public
    }

    fn begin_session(&self, keyword: &str) -> SearchSession {
        let mut session = SearchSession {
            keyword: keyword.to_string(),
            started_at: Utc::now(),
            generation: 0,
        };
        self.state.send_modify(|state| {
            session.generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *self.lock_session() = Some(session.clone());
            state.is_searching = true;
            state.error = None;
        });
        self.lock_recent().push(keyword);
        session
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<SearchSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_recent(&self) -> MutexGuard<'_, RecentQueries> {
        self.recent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: PlaceProvider + 'static> SearchAggregator<P> {
    /// Feed one keystroke's worth of input through the debouncer.
    ///
    /// The search for the last keyword of a burst runs on its own task once
    /// the quiet period elapses. A blank keyword clears results right away.
    /// Must be called from within a Tokio runtime.
    pub fn input(self: &Arc<Self>, keyword: &str) {
        let aggregator = Arc::clone(self);
        self.debouncer.schedule(keyword, move |keyword| {
            if keyword.trim().is_empty() {
                aggregator.clear_search();
                return;
            }
            tokio::spawn(async move {
                aggregator.search(&keyword).await;
            });
        });
    }
}
