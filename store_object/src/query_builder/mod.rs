//! Query builder utilities
//!
//! Predicates, read options, page arithmetic and the SQL text generated
//! from them.

pub mod options;
pub mod ordering;
pub mod pagination;
pub mod predicate;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use options::FindOptions;
pub use ordering::{OrderBy, SortOrder};
pub use pagination::{PageResult, Pagination, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use predicate::{Predicate, WhereParams};
pub use sql_generation::{Dialect, SqlGenerator, Statement};
