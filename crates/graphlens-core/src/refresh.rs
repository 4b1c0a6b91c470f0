// Downstream hook that recomputes the visible graph from the filter history.
use crate::history::HistoryState;

/// Recomputes whatever view depends on the applied filters.
///
/// Implementors own the graph dataset they filter; they only receive the new
/// history state.
pub trait GraphRefresher<F> {
    fn refresh(&mut self, state: &HistoryState<F>);
}

impl<F, T> GraphRefresher<F> for T
where
    T: FnMut(&HistoryState<F>),
{
    fn refresh(&mut self, state: &HistoryState<F>) {
        self(state)
    }
}

/// Refresher that does nothing. Used when no view is attached yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRefresh;

impl<F> GraphRefresher<F> for NoRefresh {
    fn refresh(&mut self, _state: &HistoryState<F>) {}
}
