//! Table bootstrap
//!
//! Creates missing tables from record descriptors. Existing tables are left
//! untouched; there is no schema diffing.

use store_object::Record;

use crate::core::SquadHaus;
use crate::errors::SquadHausError;

impl SquadHaus {
    /// Create the table for `T` if it does not exist
    pub async fn ensure_table<T: Record>(&self) -> Result<(), SquadHausError> {
        let descriptor = T::descriptor();
        crate::debug_log!(table = descriptor.table, fields = descriptor.fields.len(), "ensuring table");
        self.store().ensure_table(descriptor).await?;
        tracing::info!(table = descriptor.table, "table ready");
        Ok(())
    }
}
