/// Errors raised by history transitions.
use thiserror::Error;

/// Which half of the history an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Past,
    Future,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Past => write!(f, "past"),
            Side::Future => write!(f, "future"),
        }
    }
}

/// A rejected transition. The state is left untouched when one of these is
/// returned, and no subscriber is notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("index {index} is out of bounds of {side} filters (len {len})")]
    IndexOutOfRange { side: Side, index: usize, len: usize },

    #[error("there is no filter to delete")]
    EmptyHistory,
}
