//! Traits and descriptors shared by every record type and store backend

pub mod descriptor;
pub mod record;
pub mod record_store;

pub use descriptor::{FieldDef, FieldKind, RecordDescriptor};
pub use record::{Record, RecordMeta};
pub use record_store::{RecordStore, SelectQuery};
