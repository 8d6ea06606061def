//! Nodes of an API tree.
//!
//! Reimplements the source's nominal per-kind subtyping as a tagged variant
//! (see DESIGN.md, "Polymorphism over element kinds"): every [`Element`]
//! carries an [`ElementKind`] tag, and [`Check`](crate::check::Check)
//! interest sets are sets of that tag rather than a type hierarchy.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use smallvec::SmallVec;

use crate::api::Api;
use crate::archive::Archive;

/// Most elements have a handful of children (fields, parameters); inlining
/// up to four avoids a heap allocation for them. Larger sibling sets spill
/// to the heap transparently.
type Children = SmallVec<[Arc<Element>; 4]>;

/// The kind tag dispatched on by [`Check::interest`](crate::check::Check::interest)
/// and by [`DefaultDifferenceAnalyzer`](crate::default_analyzer::DefaultDifferenceAnalyzer).
///
/// `Class` is used for interfaces, enums and annotation types alike — the
/// source reuses one tag for all of them and leaves sub-kind routing to
/// individual checks, and this spec preserves that decision rather than
/// splitting it into per-sub-kind variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Method,
    Field,
    MethodParameter,
    Annotation,
    /// Escape hatch for analyzer-specific kinds the core doesn't need to know about.
    Other(&'static str),
}

impl ElementKind {
    /// Annotations are always sorted last among siblings and are leaves —
    /// see [`DefaultDifferenceAnalyzer`](crate::default_analyzer::DefaultDifferenceAnalyzer)'s
    /// annotation specialization.
    pub fn is_annotation(self) -> bool {
        matches!(self, ElementKind::Annotation)
    }
}

/// Opaque identity for an [`Element`], stable for the lifetime of the tree
/// that owns it. Used as the visited-set key during use-site traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl ElementId {
    fn fresh() -> Self {
        ElementId(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// The total order over siblings within one tree, supplied by the analyzer
/// that built it. The same comparator must be used for both the old and the
/// new tree so that co-iteration (see [`crate::coiterate`]) can match
/// elements across them.
pub type Comparator = Arc<dyn Fn(&Element, &Element) -> Ordering + Send + Sync>;

/// A node in an API tree: a type, member, parameter, annotation, or
/// whatever else an analyzer's [`ElementKind::Other`] needs to express.
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    full_name: String,
    api: Arc<Api>,
    archive: Archive,
    parent: Option<Weak<Element>>,
    children: Children,
    // Use-sites often reference elements built after this one (forward
    // references, or references across the old/new tree boundary), so
    // they're populated in a deliberate second pass via `set_use_sites`
    // once both trees exist — the one field on `Element` that isn't fixed
    // at construction time.
    use_sites: RefCell<Vec<UseSite>>,
}

impl Element {
    /// Builds one element and, via `build_children`, every descendant
    /// beneath it, using `Arc::new_cyclic` so children can hold a
    /// non-owning back-reference to their parent before the parent's `Arc`
    /// exists. Children returned by `build_children` must already be sorted
    /// by the tree's [`Comparator`] — the engine does not sort on its own,
    /// it only requires that the order be total and stable.
    pub fn build_root(
        kind: ElementKind,
        full_name: impl Into<String>,
        api: Arc<Api>,
        archive: Archive,
        build_children: impl FnOnce(&Weak<Element>) -> Vec<Arc<Element>>,
    ) -> Arc<Element> {
        Self::build_with_parent(kind, full_name, api, archive, None, build_children)
    }

    /// Builds a non-root element, recording `parent` as its (non-owning)
    /// back-reference. `parent` is normally the `&Weak<Element>` handed to
    /// the enclosing `build_root`/`build_child`'s `build_children` closure.
    pub fn build_child(
        kind: ElementKind,
        full_name: impl Into<String>,
        api: Arc<Api>,
        archive: Archive,
        parent: &Weak<Element>,
        build_children: impl FnOnce(&Weak<Element>) -> Vec<Arc<Element>>,
    ) -> Arc<Element> {
        Self::build_with_parent(kind, full_name, api, archive, Some(parent.clone()), build_children)
    }

    fn build_with_parent(
        kind: ElementKind,
        full_name: impl Into<String>,
        api: Arc<Api>,
        archive: Archive,
        parent: Option<Weak<Element>>,
        build_children: impl FnOnce(&Weak<Element>) -> Vec<Arc<Element>>,
    ) -> Arc<Element> {
        Arc::new_cyclic(|weak_self| Element {
            id: ElementId::fresh(),
            kind,
            full_name: full_name.into(),
            api,
            archive,
            parent,
            children: Children::from_vec(build_children(weak_self)),
            use_sites: RefCell::new(Vec::new()),
        })
    }

    /// Populates the use-site list after both trees have been fully built.
    /// Called at most once per element by the analyzer that owns the tree.
    pub fn set_use_sites(&self, use_sites: Vec<UseSite>) {
        *self.use_sites.borrow_mut() = use_sites;
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn api(&self) -> &Arc<Api> {
        &self.api
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn parent(&self) -> Option<Arc<Element>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> &[Arc<Element>] {
        &self.children
    }

    pub fn use_sites(&self) -> std::cell::Ref<'_, Vec<UseSite>> {
        self.use_sites.borrow()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("full_name", &self.full_name)
            .field("children", &self.children.len())
            .finish()
    }
}

/// The nature of a reference from one element (the "site") to another (the
/// "target").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseType {
    Annotation,
    FieldType,
    Parameter,
    Return,
    Thrown,
    Extends,
    Implements,
    Containment,
}

impl UseType {
    /// Whether this use-type can propagate API membership transitively —
    /// e.g. a public method's return type is pulled into the API even if
    /// declared in a supplementary archive, but an annotation generally
    /// isn't.
    pub fn moves_to_api(self) -> bool {
        !matches!(self, UseType::Annotation)
    }
}

/// A directed edge in the use-site graph: `site` refers to `target` in a
/// way tagged by `use_type`. Non-owning on both ends — use-sites are
/// lookups into the tree, never lifetime-extending.
#[derive(Clone)]
pub struct UseSite {
    pub site: Weak<Element>,
    pub target: Weak<Element>,
    pub use_type: UseType,
}

impl fmt::Debug for UseSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseSite")
            .field("use_type", &self.use_type)
            .finish()
    }
}
