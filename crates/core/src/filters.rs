//! Filter state for the tool listing
//!
//! `FilterStore` holds the current [`ToolFilters`] snapshot. Every setter
//! replaces the snapshot and notifies subscribers synchronously, in the order
//! they subscribed. Any change to the filter criteria sends the listing back
//! to page 1; only an explicit page change keeps the other fields intact.

use crate::types::{PricingModel, ToolFilters};

/// Handle returned by [`FilterStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ToolFilters) + Send>;

pub struct FilterStore {
    filters: ToolFilters,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStore")
            .field("filters", &self.filters)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            filters: ToolFilters::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current snapshot
    pub fn filters(&self) -> &ToolFilters {
        &self.filters
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ToolFilters) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.update(|f| ToolFilters {
            category,
            page: 1,
            ..f.clone()
        });
    }

    pub fn set_pricing_models(&mut self, models: Vec<PricingModel>) {
        self.update(|f| ToolFilters {
            pricing_model: models,
            page: 1,
            ..f.clone()
        });
    }

    pub fn set_min_rating(&mut self, rating: Option<f64>) {
        self.update(|f| ToolFilters {
            min_rating: rating,
            page: 1,
            ..f.clone()
        });
    }

    /// An empty search string clears the search
    pub fn set_search(&mut self, search: &str) {
        let search = (!search.is_empty()).then(|| search.to_string());
        self.update(|f| ToolFilters {
            search,
            page: 1,
            ..f.clone()
        });
    }

    pub fn set_page(&mut self, page: usize) {
        self.update(|f| ToolFilters { page, ..f.clone() });
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.update(|f| ToolFilters {
            page_size,
            page: 1,
            ..f.clone()
        });
    }

    pub fn clear_filters(&mut self) {
        self.update(|_| ToolFilters::default());
    }

    fn update(&mut self, next: impl FnOnce(&ToolFilters) -> ToolFilters) {
        self.filters = next(&self.filters);
        log::trace!("filters changed: {:?}", self.filters);

        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.filters);
        }
    }
}
