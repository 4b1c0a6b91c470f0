// Re-exports from graphlens-history, specialized to graph filters.
pub use graphlens_history::config::{resolve_data_dir, DEFAULT_STORAGE_KEY};
pub use graphlens_history::persistence::{load_snapshot, save_snapshot};
pub use graphlens_history::{
    HistoryAction, HistoryConfig, HistoryContainer, HistoryError, HistoryState,
    MemorySessionStorage, RedbSessionStorage, SessionStorage, Side, Subscription,
};

use crate::filter::GraphFilter;

/// History of graph filters.
pub type FiltersState = HistoryState<GraphFilter>;

/// Transition on a graph filter history.
pub type FilterAction = HistoryAction<GraphFilter>;
