//! HTTP interface
//!
//! Handlers translate requests into record mapper calls and map absence to
//! 404 and `StoreError`s to 400/500 JSON bodies.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, squadhaus_router};
