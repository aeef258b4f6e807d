//! Photo search
//!
//! Debounced, paginated photo search against the Flickr REST API.
//!
//! The crate follows a pure core / impure shell split: `model` and
//! `state::ui_state` are plain data and transitions, while `state::session`
//! and `source` own the async pipeline and network I/O.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;

// Line-driven front end used by the binary
pub mod integration;

#[cfg(test)]
mod test_harness;
