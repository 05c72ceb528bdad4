//! Request handler module
//!
//! Route dispatch plus the notes (placeholder) and users (store-backed)
//! handler families.

pub mod notes;
pub mod router;
pub mod users;

// Re-export main entry point
pub use router::Dispatcher;
