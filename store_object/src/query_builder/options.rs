//! Options accepted by the read operations

use crate::query_builder::ordering::OrderBy;
use crate::query_builder::predicate::Predicate;

/// Filter, projection, window and ordering of a read
///
/// `limit`/`offset` drive `find_many`; `page`/`per_page` drive
/// `find_per_page`, which computes its own limit and offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub predicate: Predicate,
    /// Projection override; every name must be a declared field
    pub fields: Option<Vec<String>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub order_by: Option<OrderBy>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicate = predicate.into();
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }
}
