//! Per-builder fragment accumulation.
//!
//! The [`FragmentAccumulator`] is the mutable state of one builder instance:
//! the filter and update fragments produced by each fluent call, in call
//! order. Terminal operations read it and compile it; they never clear it,
//! so a builder can run several terminal calls over the same criteria.
//!
//! It is owned by exactly one builder and mutated through `&mut`, so the
//! borrow checker rules out concurrent mutation without any locking.
//!
//! # Usage
//!
//! ```ignore
//! let mut session = FragmentAccumulator::new();
//! session.add_filter(Filter::eq("name", "Test One"));
//! session.add_filter(Filter::eq("active", true));
//!
//! // AND of both fragments
//! let filter = session.compiled_filter();
//! ```

use quarry_core::{Filter, Update};

/// Ordered filter and update fragments of one builder
#[derive(Debug, Clone, Default)]
pub struct FragmentAccumulator {
    filters: Vec<Filter>,
    updates: Vec<Update>,
}

impl FragmentAccumulator {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter fragment
    pub fn add_filter(&mut self, fragment: Filter) {
        self.filters.push(fragment);
    }

    /// Append an update fragment
    pub fn add_update(&mut self, fragment: Update) {
        self.updates.push(fragment);
    }

    /// Whether the fragments place any criteria
    ///
    /// Empty conjunctions count as no criteria.
    pub fn has_filters(&self) -> bool {
        self.filters.iter().any(|f| !f.is_empty())
    }

    /// Whether any update fragment has been added
    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }

    /// Filter fragments in call order
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Update fragments in call order
    pub fn updates(&self) -> &[Update] {
        &self.updates
    }

    /// Conjunction of every filter fragment, or `None` if there are no criteria
    pub fn compiled_filter(&self) -> Option<Filter> {
        if !self.has_filters() {
            return None;
        }
        Some(Filter::and(self.filters.iter().cloned()))
    }

    /// Ordered combination of every update fragment, or `None` if there are none
    pub fn compiled_update(&self) -> Option<Update> {
        if self.updates.is_empty() {
            return None;
        }
        Some(Update::combine(self.updates.iter().cloned()))
    }
}
