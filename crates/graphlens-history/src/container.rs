/// Observable filter history container.
///
/// Holds the current `HistoryState` as a shared immutable snapshot. Every
/// accepted transition swaps in a freshly produced state and then calls each
/// subscriber once, in registration order, before returning.
use std::sync::Arc;

use crate::error::HistoryError;
use crate::state::{HistoryAction, HistoryState};

type Callback<F> = Box<dyn FnMut(&HistoryState<F>)>;

/// Handle returned by [`HistoryContainer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Owns a filter history and the list of callbacks interested in it.
pub struct HistoryContainer<F> {
    state: Arc<HistoryState<F>>,
    subscribers: Vec<(Subscription, Callback<F>)>,
    next_subscription: u64,
}

impl<F> std::fmt::Debug for HistoryContainer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryContainer")
            .field("past_len", &self.state.past.len())
            .field("future_len", &self.state.future.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<F: Clone> Default for HistoryContainer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Clone> HistoryContainer<F> {
    /// Creates a container with an empty history.
    pub fn new() -> Self {
        Self::with_state(HistoryState::default())
    }

    /// Creates a container starting from an existing state.
    ///
    /// Used when restoring a stored snapshot. No subscriber exists yet, so
    /// nothing is notified.
    pub fn with_state(state: HistoryState<F>) -> Self {
        Self {
            state: Arc::new(state),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Returns a shared handle to the current state.
    pub fn snapshot(&self) -> Arc<HistoryState<F>> {
        Arc::clone(&self.state)
    }

    pub fn past(&self) -> &[F] {
        &self.state.past
    }

    pub fn future(&self) -> &[F] {
        &self.state.future
    }

    /// The last applied filter, if any.
    pub fn current(&self) -> Option<&F> {
        self.state.current()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn can_open_past(&self, index: usize) -> bool {
        self.state.can_open_past(index)
    }

    pub fn can_open_future(&self, index: usize) -> bool {
        self.state.can_open_future(index)
    }

    /// Registers a callback invoked with the new state after every accepted
    /// transition.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&HistoryState<F>) + 'static,
    ) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Applies a transition and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Propagates the transition's `HistoryError`. On error the state is
    /// unchanged and no subscriber runs.
    pub fn dispatch(&mut self, action: HistoryAction<F>) -> Result<(), HistoryError> {
        let name = action.name();
        let next = match self.state.apply(action) {
            Ok(next) => next,
            Err(e) => {
                tracing::debug!("Rejected {name}: {e}");
                return Err(e);
            }
        };
        tracing::debug!(
            "Applied {name}: past={} future={}",
            next.past.len(),
            next.future.len()
        );
        self.state = Arc::new(next);
        self.notify();
        Ok(())
    }

    /// Clears the whole history.
    pub fn reset(&mut self) {
        self.apply_infallible(HistoryAction::Reset);
    }

    /// Appends a filter. Undone filters stay available.
    pub fn add(&mut self, filter: F) {
        self.apply_infallible(HistoryAction::Add(filter));
    }

    /// Rolls back to `past[index]`, moving later filters to the future.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` unless `index < past.len() - 1`.
    pub fn open_past(&mut self, index: usize) -> Result<(), HistoryError> {
        self.dispatch(HistoryAction::OpenPast(index))
    }

    /// Re-applies undone filters up to and including `future[index]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` unless `index < future.len()`.
    pub fn open_future(&mut self, index: usize) -> Result<(), HistoryError> {
        self.dispatch(HistoryAction::OpenFuture(index))
    }

    /// Re-applies every undone filter.
    pub fn open_all_future(&mut self) {
        self.apply_infallible(HistoryAction::OpenAllFuture);
    }

    /// Removes the last applied filter.
    ///
    /// # Errors
    ///
    /// `EmptyHistory` if nothing is applied.
    pub fn delete_current(&mut self) -> Result<(), HistoryError> {
        self.dispatch(HistoryAction::DeleteCurrent)
    }

    /// Replaces the last applied filter. With nothing applied this appends.
    pub fn replace_current(&mut self, filter: F) {
        self.apply_infallible(HistoryAction::ReplaceCurrent(filter));
    }

    fn apply_infallible(&mut self, action: HistoryAction<F>) {
        if let Err(e) = self.dispatch(action) {
            tracing::warn!("Unexpected history error: {e}");
        }
    }

    fn notify(&mut self) {
        let state = Arc::clone(&self.state);
        for (_, callback) in &mut self.subscribers {
            callback(state.as_ref());
        }
    }
}
