//! Differences and the reports that carry them.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::element::Element;

/// An ordered severity, {NONE ≺ NON_BREAKING ≺ POTENTIALLY_BREAKING ≺ BREAKING}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    None,
    NonBreaking,
    PotentiallyBreaking,
    Breaking,
}

/// A compatibility dimension a [`Difference`] can be classified against
/// (e.g. "source", "binary", "semantic"). Left open rather than fixed to a
/// closed enum: the core does not define the catalog of dimensions, checks
/// do.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CompatibilityType(Cow<'static, str>);

impl CompatibilityType {
    pub const fn new(name: &'static str) -> Self {
        CompatibilityType(Cow::Borrowed(name))
    }

    pub fn owned(name: impl Into<String>) -> Self {
        CompatibilityType(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CompatibilityType {
    pub const SOURCE: CompatibilityType = CompatibilityType::new("source");
    pub const BINARY: CompatibilityType = CompatibilityType::new("binary");
    pub const SEMANTIC: CompatibilityType = CompatibilityType::new("semantic");
}

/// An immutable record describing one API change. Never mutates after
/// creation; [`Transform`](crate::transform::Transform)s produce
/// replacements rather than editing in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    code: String,
    name: String,
    description: String,
    attachments: IndexMap<String, String>,
    classifications: IndexMap<CompatibilityType, Severity>,
}

impl Difference {
    pub fn new(code: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            attachments: IndexMap::new(),
            classifications: IndexMap::new(),
        }
    }

    pub fn with_classification(mut self, dimension: CompatibilityType, severity: Severity) -> Self {
        self.classifications.insert(dimension, severity);
        self
    }

    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attachments(&self) -> &IndexMap<String, String> {
        &self.attachments
    }

    pub fn classifications(&self) -> &IndexMap<CompatibilityType, Severity> {
        &self.classifications
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// A difference list plus the pair it was raised against. Either element
/// may be absent (addition/removal). Empty reports are legal but are
/// dropped before reaching reporters — see [`crate::transform::apply_chain`].
#[derive(Debug, Clone)]
pub struct Report {
    pub old: Option<Arc<Element>>,
    pub new: Option<Arc<Element>>,
    pub differences: Vec<Difference>,
}

impl Report {
    pub fn new(old: Option<Arc<Element>>, new: Option<Arc<Element>>, differences: Vec<Difference>) -> Self {
        Self { old, new, differences }
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }
}
