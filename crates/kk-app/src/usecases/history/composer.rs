use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, Instrument};

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryFilter, HistoryQuery, HistoryRecord, SortOrder};

use super::live_query::run_live_query;

/// Drives the history list from the current filter.
///
/// Exactly one live query is active at a time. Changing the filter aborts it and
/// starts the query picked by [`HistoryFilter::selected_query`]. Emissions are tagged
/// with a generation number; the output only accepts emissions from the current
/// generation, so a result computed for a replaced query is never published.
///
/// 历史记录查询组合器：同一时间只有一个活跃查询。
pub struct HistoryQueryComposer {
    repo: Arc<dyn HistoryRepositoryPort>,
    filter: HistoryFilter,
    active: Option<AbortHandle>,
    generation: Arc<Mutex<u64>>,
    output: Arc<watch::Sender<Vec<HistoryRecord>>>,
}

impl HistoryQueryComposer {
    /// Starts with the default filter (all records, newest first).
    /// Must be called inside a tokio runtime.
    pub fn new(repo: Arc<dyn HistoryRepositoryPort>) -> Self {
        Self::with_filter(repo, HistoryFilter::default())
    }

    pub fn with_filter(repo: Arc<dyn HistoryRepositoryPort>, filter: HistoryFilter) -> Self {
        let (output, _) = watch::channel(Vec::new());
        let mut composer = Self {
            repo,
            filter,
            active: None,
            generation: Arc::new(Mutex::new(0)),
            output: Arc::new(output),
        };
        composer.reselect();
        composer
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<HistoryRecord>> {
        self.output.subscribe()
    }

    pub fn filter(&self) -> &HistoryFilter {
        &self.filter
    }

    pub fn selected_query(&self) -> HistoryQuery {
        self.filter.selected_query()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.filter.search_query != query {
            self.filter.search_query = query;
            self.reselect();
        }
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        if self.filter.favorites_only != favorites_only {
            self.filter.favorites_only = favorites_only;
            self.reselect();
        }
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        if self.filter.sort_order != sort_order {
            self.filter.sort_order = sort_order;
            self.reselect();
        }
    }

    fn reselect(&mut self) {
        if let Some(previous) = self.active.take() {
            previous.abort();
        }

        let current = {
            let mut generation = match self.generation.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *generation += 1;
            *generation
        };

        let query = self.filter.selected_query();
        debug!(generation = current, query = ?query, "history query selected");

        let generation = Arc::clone(&self.generation);
        let output = Arc::clone(&self.output);
        let span = tracing::debug_span!("history.composer.upstream", generation = current);
        let task = tokio::spawn(
            run_live_query(Arc::clone(&self.repo), query, move |records| {
                // The lock is held while publishing so a switch cannot slip in between
                // the generation check and the send.
                let guard = match generation.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if *guard != current {
                    return false;
                }
                output.send_replace(records);
                true
            })
            .instrument(span),
        );
        self.active = Some(task.abort_handle());
    }
}

impl Drop for HistoryQueryComposer {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.abort();
        }
    }
}
