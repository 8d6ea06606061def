//! The set of archives analyzed together.

use crate::archive::Archive;

/// An immutable pair of archive sets: the API under analysis and the
/// supplementary archives needed to resolve references out of it.
///
/// Attached to every [`Element`](crate::element::Element) for provenance.
#[derive(Debug, Clone)]
pub struct Api {
    primary: Vec<Archive>,
    supplementary: Vec<Archive>,
}

impl Api {
    pub fn new(primary: Vec<Archive>, supplementary: Vec<Archive>) -> Self {
        Self {
            primary,
            supplementary,
        }
    }

    pub fn primary(&self) -> &[Archive] {
        &self.primary
    }

    pub fn supplementary(&self) -> &[Archive] {
        &self.supplementary
    }

    /// Whether `archive` is one of this API's primary archives, i.e. whether
    /// an element owned by it counts as "in the API" for use-site purposes.
    pub fn is_primary(&self, archive: &Archive) -> bool {
        self.primary.contains(archive)
    }
}
