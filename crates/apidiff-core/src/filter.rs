//! Predicate gates controlling whether a pair is analyzed and descended into.

use crate::element::Element;

/// A predicate gate. `applies(None)` is always `true`, so an absent side of
/// a pair never gets filtered out on its own. Multiple filters are composed
/// conjunctively by [`CompositeFilter`].
pub trait ElementFilter: Send + Sync {
    fn applies(&self, element: Option<&Element>) -> bool;
    fn should_descend_into(&self, element: &Element) -> bool;
}

/// ANDs together an arbitrary number of [`ElementFilter`]s. An empty set
/// accepts everything and descends everywhere.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn ElementFilter>>,
}

impl CompositeFilter {
    pub fn new(filters: Vec<Box<dyn ElementFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Box<dyn ElementFilter>) {
        self.filters.push(filter);
    }
}

impl ElementFilter for CompositeFilter {
    fn applies(&self, element: Option<&Element>) -> bool {
        self.filters.iter().all(|f| f.applies(element))
    }

    fn should_descend_into(&self, element: &Element) -> bool {
        self.filters.iter().all(|f| f.should_descend_into(element))
    }
}
