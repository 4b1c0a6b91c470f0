/// Filter history state and the pure transitions that produce new states.
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Side};

/// The applied/undone split of a filter history.
///
/// `past` holds the filters currently in effect, oldest first. `future`
/// holds undone filters, the one closest to `past` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState<F> {
    pub past: Vec<F>,
    pub future: Vec<F>,
}

impl<F> Default for HistoryState<F> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
        }
    }
}

/// A transition request. Applying one never mutates the source state.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction<F> {
    /// Drop everything.
    Reset,
    /// Append to `past`. `future` is kept as is.
    Add(F),
    /// Keep `past[..=index]` applied and move the rest in front of `future`.
    OpenPast(usize),
    /// Re-apply `future[..=index]`.
    OpenFuture(usize),
    /// Re-apply the whole of `future`.
    OpenAllFuture,
    /// Remove the last applied filter.
    DeleteCurrent,
    /// Swap the last applied filter for a new one.
    ReplaceCurrent(F),
}

impl<F> HistoryAction<F> {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            HistoryAction::Reset => "reset",
            HistoryAction::Add(_) => "add",
            HistoryAction::OpenPast(_) => "open_past",
            HistoryAction::OpenFuture(_) => "open_future",
            HistoryAction::OpenAllFuture => "open_all_future",
            HistoryAction::DeleteCurrent => "delete_current",
            HistoryAction::ReplaceCurrent(_) => "replace_current",
        }
    }
}

impl<F> HistoryState<F> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from explicit halves.
    pub fn from_parts(past: Vec<F>, future: Vec<F>) -> Self {
        Self { past, future }
    }

    /// The last applied filter, if any.
    pub fn current(&self) -> Option<&F> {
        self.past.last()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    /// Whether `OpenPast(index)` would be accepted.
    ///
    /// The last past entry is never a valid target: opening it would be a no-op.
    pub fn can_open_past(&self, index: usize) -> bool {
        index < self.past.len().saturating_sub(1)
    }

    /// Whether `OpenFuture(index)` would be accepted.
    pub fn can_open_future(&self, index: usize) -> bool {
        index < self.future.len()
    }
}

impl<F: Clone> HistoryState<F> {
    /// Produces the state that results from `action`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` when an `OpenPast`/`OpenFuture` index falls
    /// outside its bound, and `EmptyHistory` for `DeleteCurrent` with nothing
    /// applied.
    pub fn apply(&self, action: HistoryAction<F>) -> Result<Self, HistoryError> {
        match action {
            HistoryAction::Reset => Ok(Self::default()),
            HistoryAction::Add(filter) => {
                let mut past = self.past.clone();
                past.push(filter);
                Ok(Self {
                    past,
                    future: self.future.clone(),
                })
            }
            HistoryAction::OpenPast(index) => {
                if !self.can_open_past(index) {
                    return Err(HistoryError::IndexOutOfRange {
                        side: Side::Past,
                        index,
                        len: self.past.len(),
                    });
                }
                let (kept, reopened) = self.past.split_at(index + 1);
                let mut future = reopened.to_vec();
                future.extend_from_slice(&self.future);
                Ok(Self {
                    past: kept.to_vec(),
                    future,
                })
            }
            HistoryAction::OpenFuture(index) => {
                if !self.can_open_future(index) {
                    return Err(HistoryError::IndexOutOfRange {
                        side: Side::Future,
                        index,
                        len: self.future.len(),
                    });
                }
                let (reapplied, remaining) = self.future.split_at(index + 1);
                let mut past = self.past.clone();
                past.extend_from_slice(reapplied);
                Ok(Self {
                    past,
                    future: remaining.to_vec(),
                })
            }
            HistoryAction::OpenAllFuture => {
                let mut past = self.past.clone();
                past.extend_from_slice(&self.future);
                Ok(Self {
                    past,
                    future: Vec::new(),
                })
            }
            HistoryAction::DeleteCurrent => {
                let Some((_, rest)) = self.past.split_last() else {
                    return Err(HistoryError::EmptyHistory);
                };
                Ok(Self {
                    past: rest.to_vec(),
                    future: self.future.clone(),
                })
            }
            HistoryAction::ReplaceCurrent(filter) => {
                let mut past = self.past.clone();
                past.pop();
                past.push(filter);
                Ok(Self {
                    past,
                    future: self.future.clone(),
                })
            }
        }
    }
}
