pub mod core;
pub mod persistence;
pub mod queries;

pub use core::GenericStore;
