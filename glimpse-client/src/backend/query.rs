/// Listing query builder
///
/// Listings are shaped by an order, a page limit, an optional cursor
/// (the id of the document the page starts after), and field filters.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Filter {
    Equal { field: String, value: String },
    Search { field: String, term: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
    pub cursor_after: Option<String>,
    pub filters: Vec<Filter>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start the page after the document with this id
    pub fn cursor_after(mut self, document_id: impl Into<String>) -> Self {
        self.cursor_after = Some(document_id.into());
        self
    }

    pub fn equal(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Equal {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn search(mut self, field: impl Into<String>, term: impl Into<String>) -> Self {
        self.filters.push(Filter::Search {
            field: field.into(),
            term: term.into(),
        });
        self
    }
}
