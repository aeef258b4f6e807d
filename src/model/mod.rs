//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod page;
pub mod photo;
pub mod query;

// Re-export for convenience
pub use error::{AppError, FetchError};
pub use page::{PageRequest, PaginatedResult, DEFAULT_PER_PAGE, FIRST_PAGE};
pub use photo::Photo;
pub use query::SearchQuery;
