/// Undo/redo history of applied graph filters.
///
/// Provides a `HistoryContainer` that splits applied filters into `past` and
/// `future`, produces a new immutable state on every transition and notifies
/// its subscribers synchronously. Snapshots can be written as JSON to a
/// session-scoped key-value store.
pub mod config;
pub mod container;
pub mod error;
pub mod persistence;
pub mod state;

pub use config::HistoryConfig;
pub use container::{HistoryContainer, Subscription};
pub use error::{HistoryError, Side};
pub use persistence::{MemorySessionStorage, RedbSessionStorage, SessionStorage};
pub use state::{HistoryAction, HistoryState};
