//! Record types served by SquadHaus

pub mod squad;

pub use squad::Squad;
