//! The pluggable unit of comparison logic.

use crate::api::Api;
use crate::config::Configuration;
use crate::difference::Difference;
use crate::element::{Element, ElementKind};

/// Compares one pair of elements (or descends into an annotation pair) and
/// raises [`Difference`]s. A single `Check` instance is reused across an
/// entire tree walk and may hold per-analysis state; [`reset`](Check::reset)
/// is called once per top-level analysis before the walk starts.
///
/// Dispatch is by [`ElementKind`] via [`interest`](Check::interest) — the
/// [`DefaultDifferenceAnalyzer`](crate::default_analyzer::DefaultDifferenceAnalyzer)
/// only calls a check's `visit_*`/`end_*` methods for kinds it declared
/// interest in.
pub trait Check: Send + Sync {
    /// The stable codes this check can raise, for documentation and
    /// `--report-only`/`--excludes` matching. Never empty for a useful check.
    fn codes(&self) -> &'static [&'static str];

    /// The element kinds this check wants to be dispatched for. A check not
    /// interested in [`ElementKind::Annotation`] never sees annotation pairs
    /// directly — see [`visit_annotation`](Check::visit_annotation).
    fn interest(&self) -> &'static [ElementKind];

    /// Called exactly once, before any visit, with the engine's
    /// configuration. The default no-op is correct for checks with no
    /// configurable behavior.
    fn initialize(&mut self, config: &Configuration) {
        let _ = config;
    }

    /// Tells the check which API it's comparing from. Called once per
    /// top-level analysis, before the walk starts.
    fn set_old_environment(&mut self, api: &Api) {
        let _ = api;
    }

    /// Symmetric to [`set_old_environment`](Check::set_old_environment) for
    /// the new-side API.
    fn set_new_environment(&mut self, api: &Api) {
        let _ = api;
    }

    /// Resets any per-analysis accumulated state. Called once before each
    /// top-level [`Engine::analyze`](crate::engine::Engine::analyze) call.
    fn reset(&mut self) {}

    /// Called when a new pair of elements of an interested kind is opened.
    /// `old`/`new` mirror the co-iteration pairing: either may be absent for
    /// an addition or removal. `end` receives the same pair, so a check that
    /// only needs this one pair's data (not anything accumulated across its
    /// descendants) can do all of its work there instead; `visit` exists for
    /// checks that need to push a record before descendants are visited
    /// (e.g. to accumulate state across a subtree).
    fn visit(&mut self, old: Option<&Element>, new: Option<&Element>) {
        let _ = (old, new);
    }

    /// Called when the pair opened by a matching `visit` call is closed,
    /// i.e. every descendant has been visited. Most checks never need this;
    /// it exists for checks that accumulate state across a subtree (e.g.
    /// "did any overload of this method change return type").
    fn end(&mut self, old: Option<&Element>, new: Option<&Element>) -> Vec<Difference> {
        let _ = (old, new);
        Vec::new()
    }

    /// Specialization for annotation pairs: annotations are
    /// never pushed on the analyzer's open-kind stack, so a check interested
    /// in them is asked directly rather than via `visit`/`end`, and any
    /// differences it raises are attached to the *parent* element's close
    /// rather than treated as differences of the annotation itself.
    fn visit_annotation(&mut self, old: Option<&Element>, new: Option<&Element>) -> Vec<Difference> {
        let _ = (old, new);
        Vec::new()
    }
}
