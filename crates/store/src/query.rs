use crate::product::Category;

/// Builder for catalog product queries.
///
/// Mirrors the storefront's filters: category tabs, free-text search, and
/// paging. Results are always ordered by creation time, newest first.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Filter by category.
    pub category: Option<Category>,

    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,

    /// Maximum number of products to return.
    pub limit: Option<usize>,

    /// Number of products to skip.
    pub offset: Option<usize>,
}

impl ProductQuery {
    /// Creates a new empty query (all products, newest first).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a specific category.
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    /// Filters by category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Filters by a search term matched against name and description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if a product's text fields match the search term.
    pub fn matches_search(&self, name: &str, description: &str) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                name.to_lowercase().contains(&term)
                    || description.to_lowercase().contains(&term)
            }
        }
    }
}
