use pulpo_shared::schemas::Item;

use super::distinct_values;

pub const ITEMS_PER_PAGE: usize = 25;

/// Inventory table filters. Empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub search: String,
    pub category: String,
    pub supplier: String,
    pub stock_status: String,
    pub alert_level: String,
}

impl InventoryFilter {
    pub fn matches(&self, item: &Item) -> bool {
        let search = self.search.to_lowercase();
        item.name.to_lowercase().contains(&search)
            && (self.category.is_empty() || item.category == self.category)
            && (self.supplier.is_empty() || item.supplier == self.supplier)
            && (self.stock_status.is_empty() || item.stock_status.as_str() == self.stock_status)
            && (self.alert_level.is_empty() || item.alert_level.as_str() == self.alert_level)
    }

    /// Query pairs that reproduce this filter, skipping empty ones.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("q", self.search.as_str()),
            ("categoria", self.category.as_str()),
            ("proveedor", self.supplier.as_str()),
            ("estado", self.stock_status.as_str()),
            ("alerta", self.alert_level.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .collect()
    }
}

pub fn filter_items<'a>(items: &'a [Item], filter: &InventoryFilter) -> Vec<&'a Item> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out one page. The requested page is clamped into range and there
/// is always at least one page, even for an empty list.
pub fn paginate<T>(items: &[T], requested: usize) -> (&[T], Pagination) {
    let total_pages = items.len().div_ceil(ITEMS_PER_PAGE).max(1);
    let page = requested.clamp(1, total_pages);
    let start = (page - 1) * ITEMS_PER_PAGE;
    let end = (start + ITEMS_PER_PAGE).min(items.len());
    (&items[start.min(end)..end], Pagination { page, total_pages })
}

/// Choices offered by the filter selects and the form's datalists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub suppliers: Vec<String>,
    pub units: Vec<String>,
}

impl FilterOptions {
    pub fn from_items(items: &[Item]) -> Self {
        Self {
            categories: distinct_values(items.iter().map(|i| i.category.as_str())),
            suppliers: distinct_values(items.iter().map(|i| i.supplier.as_str())),
            units: distinct_values(items.iter().map(|i| i.unit.as_str())),
        }
    }
}
