pub mod filter;
pub mod history;
pub mod refresh;
pub mod session;

pub use filter::{GraphFilter, ItemType};
pub use history::{FilterAction, FiltersState};
pub use refresh::{GraphRefresher, NoRefresh};
pub use session::FilterSession;
