//! Escape hatch for in-host composition.
//!
//! [`Queryable`] is the base collection handed to `queryable` and
//! `queryable_many` transforms: every document matching the builder's
//! accumulated filter, decoded into the model type. It is a plain iterator,
//! so sorting, projection, extra predicates and paging use the standard
//! iterator adaptors.

use std::vec;

/// Models matching a builder's filter, in storage order
#[derive(Debug)]
pub struct Queryable<M> {
    items: vec::IntoIter<M>,
}

impl<M> Queryable<M> {
    pub(crate) fn new(items: Vec<M>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<M> Iterator for Queryable<M> {
    type Item = M;

    fn next(&mut self) -> Option<M> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<M> DoubleEndedIterator for Queryable<M> {
    fn next_back(&mut self) -> Option<M> {
        self.items.next_back()
    }
}

impl<M> ExactSizeIterator for Queryable<M> {}
