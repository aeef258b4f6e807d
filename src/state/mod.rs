//! Search state: the pure screen state and the session that drives it.

pub mod session;
pub mod ui_state;

pub use session::{SearchSession, SessionOptions, DEFAULT_DEBOUNCE};
pub use ui_state::SearchUiState;
