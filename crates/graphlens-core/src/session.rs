/// A filter history bound to session storage and a graph refresher.
///
/// The session owns the `HistoryContainer` and registers one subscriber on
/// it. After every accepted transition that subscriber writes the JSON
/// snapshot under the configured key, then hands the new state to the
/// refresher.
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::filter::GraphFilter;
use crate::history::{
    load_snapshot, save_snapshot, HistoryAction, HistoryConfig, HistoryContainer, HistoryError,
    HistoryState, RedbSessionStorage, SessionStorage,
};
use crate::refresh::GraphRefresher;

pub struct FilterSession<F = GraphFilter> {
    history: HistoryContainer<F>,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
}

impl<F> std::fmt::Debug for FilterSession<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSession")
            .field("history", &self.history)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl<F> FilterSession<F>
where
    F: Clone + Serialize + DeserializeOwned + 'static,
{
    /// Opens the redb session store in `config.data_dir` and starts a session.
    ///
    /// By default the store is wiped and the history starts empty, so each
    /// process gets a fresh session. With `restore_on_open` (see
    /// [`HistoryConfig::reloading`]) the snapshot left by the running session
    /// is picked up instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the session database cannot be opened.
    pub fn open(
        config: &HistoryConfig,
        refresher: impl GraphRefresher<F> + 'static,
    ) -> Result<Self> {
        let opened = if config.restore_on_open {
            RedbSessionStorage::open(&config.data_dir)
        } else {
            RedbSessionStorage::open_session(&config.data_dir)
        };
        let storage: Arc<dyn SessionStorage> =
            opened.context("Failed to open filter session storage")?;

        Ok(Self::restore(config, storage, refresher))
    }

    /// Starts an empty session on `storage`.
    pub fn new(
        config: &HistoryConfig,
        storage: Arc<dyn SessionStorage>,
        refresher: impl GraphRefresher<F> + 'static,
    ) -> Self {
        Self::bind(
            HistoryContainer::new(),
            storage,
            config.storage_key.clone(),
            refresher,
        )
    }

    /// Starts a session from the snapshot already in `storage`, if any.
    ///
    /// A missing snapshot, or `restore_on_open` being off, gives an empty
    /// history. An unreadable snapshot is logged and ignored. A restored
    /// non-empty history is handed to the refresher once so the view matches
    /// it.
    pub fn restore(
        config: &HistoryConfig,
        storage: Arc<dyn SessionStorage>,
        mut refresher: impl GraphRefresher<F> + 'static,
    ) -> Self {
        if !config.restore_on_open {
            return Self::new(config, storage, refresher);
        }

        let state = match load_snapshot::<F>(storage.as_ref(), &config.storage_key) {
            Ok(Some(state)) => {
                tracing::info!(
                    "Restored filter history: past={} future={}",
                    state.past.len(),
                    state.future.len()
                );
                state
            }
            Ok(None) => HistoryState::default(),
            Err(e) => {
                tracing::warn!("Ignoring stored filter history: {e:#}");
                HistoryState::default()
            }
        };

        if !state.is_empty() {
            refresher.refresh(&state);
        }

        Self::bind(
            HistoryContainer::with_state(state),
            storage,
            config.storage_key.clone(),
            refresher,
        )
    }

    fn bind(
        mut history: HistoryContainer<F>,
        storage: Arc<dyn SessionStorage>,
        storage_key: String,
        mut refresher: impl GraphRefresher<F> + 'static,
    ) -> Self {
        let sink = Arc::clone(&storage);
        let key = storage_key.clone();
        history.subscribe(move |state: &HistoryState<F>| {
            if let Err(e) = save_snapshot(sink.as_ref(), &key, state) {
                tracing::warn!("Failed to persist filter history: {e:#}");
            }
            refresher.refresh(state);
        });

        Self {
            history,
            storage,
            storage_key,
        }
    }

    /// The underlying container, for reads.
    pub fn history(&self) -> &HistoryContainer<F> {
        &self.history
    }

    /// The underlying container, for extra subscribers.
    pub fn history_mut(&mut self) -> &mut HistoryContainer<F> {
        &mut self.history
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Applies a transition.
    ///
    /// # Errors
    ///
    /// Propagates the container's `HistoryError`.
    pub fn dispatch(&mut self, action: HistoryAction<F>) -> Result<(), HistoryError> {
        self.history.dispatch(action)
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }

    pub fn add(&mut self, filter: F) {
        self.history.add(filter);
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` unless `index < past.len() - 1`.
    pub fn open_past(&mut self, index: usize) -> Result<(), HistoryError> {
        self.history.open_past(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` unless `index < future.len()`.
    pub fn open_future(&mut self, index: usize) -> Result<(), HistoryError> {
        self.history.open_future(index)
    }

    pub fn open_all_future(&mut self) {
        self.history.open_all_future();
    }

    /// # Errors
    ///
    /// `EmptyHistory` if no filter is applied.
    pub fn delete_current(&mut self) -> Result<(), HistoryError> {
        self.history.delete_current()
    }

    pub fn replace_current(&mut self, filter: F) {
        self.history.replace_current(filter);
    }

    /// Ends the session and drops its stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage removal fails.
    pub fn discard(self) -> Result<()> {
        self.storage
            .remove_item(&self.storage_key)
            .context("Failed to discard filter history")
    }
}
