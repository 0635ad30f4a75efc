//! Result ordering

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    /// A declared column, validated and quoted when rendered
    Column(String, SortOrder),
    /// Emitted verbatim after `ORDER BY`
    Raw(String),
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        OrderBy::Column(column.into(), SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        OrderBy::Column(column.into(), SortOrder::Desc)
    }

    pub fn raw(expression: impl Into<String>) -> Self {
        OrderBy::Raw(expression.into())
    }

    /// Parse `column` or `-column` (descending)
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(column) => Self::desc(column),
            None => Self::asc(raw),
        }
    }
}
