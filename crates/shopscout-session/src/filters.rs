//! Holder for the user's current filter inputs.

use shopscout_core::types::{Category, FilterState, PriceRange};

/// Plain value store for `FilterState`.
///
/// Updates are synchronous and only touch the held value. Price bounds are
/// stored as given; keeping `min <= max` is up to the control producing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new(initial_price: PriceRange) -> Self {
        Self {
            state: FilterState::with_price(initial_price),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn snapshot(&self) -> FilterState {
        self.state.clone()
    }

    /// Returns whether the value changed.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.state.query == query {
            return false;
        }
        self.state.query = query;
        true
    }

    /// Returns whether the value changed.
    pub fn set_price_range(&mut self, price: PriceRange) -> bool {
        if self.state.price == price {
            return false;
        }
        if !price.is_ordered() {
            tracing::debug!(min = price.min, max = price.max, "Storing inverted price range");
        }
        self.state.price = price;
        true
    }

    /// Returns whether the value changed.
    pub fn set_category(&mut self, category: Category) -> bool {
        if self.state.category == category {
            return false;
        }
        self.state.category = category;
        true
    }
}
