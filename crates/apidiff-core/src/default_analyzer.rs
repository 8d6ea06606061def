//! The default, check-multiplexing [`DifferenceAnalyzer`].

use std::sync::Arc;

use crate::check::Check;
use crate::difference::{Difference, Report};
use crate::element::{Element, ElementKind};
use crate::error::AnalysisError;

/// Stateful visitor of element pairs, bracketing a whole traversal with
/// [`open`](DifferenceAnalyzer::open)/[`close`](DifferenceAnalyzer::close)
/// and each pair with
/// [`begin_analysis`](DifferenceAnalyzer::begin_analysis)/[`end_analysis`](DifferenceAnalyzer::end_analysis).
/// [`crate::traversal::traverse`] guarantees exactly one `end_analysis` per
/// `begin_analysis`, in LIFO order, after every descendant's `end_analysis`
/// has run.
pub trait DifferenceAnalyzer {
    fn open(&mut self) -> Result<(), AnalysisError> {
        Ok(())
    }

    fn begin_analysis(&mut self, old: Option<&Arc<Element>>, new: Option<&Arc<Element>>);

    fn end_analysis(&mut self, old: Option<&Arc<Element>>, new: Option<&Arc<Element>>) -> Report;

    fn close(&mut self) -> Result<(), AnalysisError> {
        Ok(())
    }
}

/// Pairs an `open()` with exactly one `close()` on every exit path,
/// including panics. Construct with [`DifferenceAnalyzerGuard::open`]; the
/// wrapped analyzer is reached
/// through [`Deref`]/[`DerefMut`] for the duration of the traversal.
pub struct DifferenceAnalyzerGuard<'a> {
    analyzer: &'a mut dyn DifferenceAnalyzer,
    closed: bool,
}

impl<'a> DifferenceAnalyzerGuard<'a> {
    pub fn open(analyzer: &'a mut dyn DifferenceAnalyzer) -> Result<Self, AnalysisError> {
        analyzer.open()?;
        Ok(Self { analyzer, closed: false })
    }

    /// Closes the analyzer explicitly, returning any error instead of
    /// logging and swallowing it as `Drop` must.
    pub fn close(mut self) -> Result<(), AnalysisError> {
        self.closed = true;
        self.analyzer.close()
    }
}

impl std::ops::Deref for DifferenceAnalyzerGuard<'_> {
    type Target = dyn DifferenceAnalyzer;
    fn deref(&self) -> &Self::Target {
        self.analyzer
    }
}

impl std::ops::DerefMut for DifferenceAnalyzerGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.analyzer
    }
}

impl Drop for DifferenceAnalyzerGuard<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.analyzer.close() {
                tracing::warn!(%error, "force-closing DifferenceAnalyzer during unwind failed");
            }
        }
    }
}

/// One open frame on the kind stack: the non-annotation pair that was begun,
/// plus the annotation differences buffered for it.
struct OpenFrame {
    old: Option<Arc<Element>>,
    new: Option<Arc<Element>>,
    kind: ElementKind,
    buffered_annotation_differences: Vec<Difference>,
}

/// Multiplexes a fixed set of [`Check`]s over the traversal. Maintains a
/// stack of open (non-annotation) pairs: annotations are never pushed onto
/// it, their differences are buffered into the current top frame instead.
pub struct DefaultDifferenceAnalyzer {
    checks: Vec<Box<dyn Check>>,
    kind_stack: Vec<OpenFrame>,
}

impl DefaultDifferenceAnalyzer {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            checks,
            kind_stack: Vec::new(),
        }
    }

    /// Forwards to every check's [`Check::initialize`]. Called once, before
    /// the first [`open`](DifferenceAnalyzer::open).
    pub fn initialize(&mut self, config: &crate::config::Configuration) {
        for check in &mut self.checks {
            check.initialize(config);
        }
    }

    /// Forwards to every check's `set_old_environment`/`set_new_environment`.
    /// Called once per top-level analysis, before the traversal starts.
    pub fn set_environments(&mut self, old_api: &crate::api::Api, new_api: &crate::api::Api) {
        for check in &mut self.checks {
            check.set_old_environment(old_api);
            check.set_new_environment(new_api);
        }
    }

    fn kind_of(old: Option<&Arc<Element>>, new: Option<&Arc<Element>>) -> ElementKind {
        old.map(|e| e.kind())
            .or_else(|| new.map(|e| e.kind()))
            .expect("begin_analysis called with both sides absent")
    }

    fn interested<'a>(&'a mut self, kind: ElementKind) -> impl Iterator<Item = &'a mut Box<dyn Check>> {
        self.checks.iter_mut().filter(move |c| c.interest().contains(&kind))
    }
}

impl DifferenceAnalyzer for DefaultDifferenceAnalyzer {
    fn open(&mut self) -> Result<(), AnalysisError> {
        self.kind_stack.clear();
        for check in &mut self.checks {
            check.reset();
        }
        Ok(())
    }

    fn begin_analysis(&mut self, old: Option<&Arc<Element>>, new: Option<&Arc<Element>>) {
        let kind = Self::kind_of(old, new);

        if kind.is_annotation() {
            let old_ref = old.map(Arc::as_ref);
            let new_ref = new.map(Arc::as_ref);
            let mut differences = Vec::new();
            for check in self.interested(kind) {
                differences.extend(check.visit_annotation(old_ref, new_ref));
            }
            if let Some(parent_frame) = self.kind_stack.last_mut() {
                parent_frame.buffered_annotation_differences.extend(differences);
            }
            return;
        }

        let old_ref = old.map(Arc::as_ref);
        let new_ref = new.map(Arc::as_ref);
        for check in self.interested(kind) {
            check.visit(old_ref, new_ref);
        }

        self.kind_stack.push(OpenFrame {
            old: old.cloned(),
            new: new.cloned(),
            kind,
            buffered_annotation_differences: Vec::new(),
        });
    }

    fn end_analysis(&mut self, old: Option<&Arc<Element>>, new: Option<&Arc<Element>>) -> Report {
        let kind = Self::kind_of(old, new);

        if kind.is_annotation() {
            return Report::new(old.cloned(), new.cloned(), Vec::new());
        }

        let frame = self
            .kind_stack
            .pop()
            .expect("end_analysis called without a matching begin_analysis");
        debug_assert_eq!(frame.kind, kind);

        let old_ref = old.map(Arc::as_ref);
        let new_ref = new.map(Arc::as_ref);
        let mut differences = Vec::new();
        for check in self.interested(kind) {
            differences.extend(check.end(old_ref, new_ref));
        }
        differences.extend(frame.buffered_annotation_differences);

        Report::new(old.cloned(), new.cloned(), differences)
    }

    fn close(&mut self) -> Result<(), AnalysisError> {
        debug_assert!(self.kind_stack.is_empty(), "close() called with open analyses remaining");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::archive::Archive;
    use crate::difference::CompatibilityType;

    struct AddedCheck;
    impl Check for AddedCheck {
        fn codes(&self) -> &'static [&'static str] {
            &["ADDED"]
        }
        fn interest(&self) -> &'static [ElementKind] {
            &[ElementKind::Class]
        }
        fn end(&mut self, old: Option<&Element>, _new: Option<&Element>) -> Vec<Difference> {
            if old.is_none() {
                vec![Difference::new("ADDED", "Added", "element added")]
            } else {
                Vec::new()
            }
        }
    }

    struct AnnotationDiffCheck;
    impl Check for AnnotationDiffCheck {
        fn codes(&self) -> &'static [&'static str] {
            &["ANNOTATION_CHANGED"]
        }
        fn interest(&self) -> &'static [ElementKind] {
            &[ElementKind::Annotation]
        }
        fn visit_annotation(&mut self, old: Option<&Element>, new: Option<&Element>) -> Vec<Difference> {
            match (old, new) {
                (Some(o), Some(n)) if o.full_name() != n.full_name() => {
                    vec![Difference::new("ANNOTATION_CHANGED", "Annotation changed", "annotation differs")
                        .with_classification(CompatibilityType::SOURCE, crate::difference::Severity::NonBreaking)]
                }
                _ => Vec::new(),
            }
        }
    }

    fn leaf(kind: ElementKind, name: &str) -> Arc<Element> {
        let api = Arc::new(Api::new(vec![Archive::new("a", vec![])], vec![]));
        Element::build_root(kind, name, api, Archive::new("a", vec![]), |_| vec![])
    }

    #[test]
    fn annotation_differences_attach_to_parent_close() {
        let mut analyzer = DefaultDifferenceAnalyzer::new(vec![Box::new(AnnotationDiffCheck)]);
        analyzer.open().unwrap();

        let t_old = leaf(ElementKind::Class, "T");
        let t_new = leaf(ElementKind::Class, "T");
        analyzer.begin_analysis(Some(&t_old), Some(&t_new));

        let a_old = leaf(ElementKind::Annotation, "@A");
        let a_new = leaf(ElementKind::Annotation, "@B");
        analyzer.begin_analysis(Some(&a_old), Some(&a_new));
        let annotation_report = analyzer.end_analysis(Some(&a_old), Some(&a_new));
        assert!(annotation_report.is_empty());

        let parent_report = analyzer.end_analysis(Some(&t_old), Some(&t_new));
        assert_eq!(parent_report.differences.len(), 1);
        assert_eq!(parent_report.differences[0].code(), "ANNOTATION_CHANGED");

        analyzer.close().unwrap();
    }

    #[test]
    fn added_element_is_reported_on_close() {
        let mut analyzer = DefaultDifferenceAnalyzer::new(vec![Box::new(AddedCheck)]);
        analyzer.open().unwrap();

        let b = leaf(ElementKind::Class, "b");
        analyzer.begin_analysis(None, Some(&b));
        let report = analyzer.end_analysis(None, Some(&b));
        assert_eq!(report.differences.len(), 1);
        assert_eq!(report.differences[0].code(), "ADDED");

        analyzer.close().unwrap();
    }

    #[test]
    fn matched_elements_produce_empty_report() {
        let mut analyzer = DefaultDifferenceAnalyzer::new(vec![Box::new(AddedCheck)]);
        analyzer.open().unwrap();

        let a_old = leaf(ElementKind::Class, "a");
        let a_new = leaf(ElementKind::Class, "a");
        analyzer.begin_analysis(Some(&a_old), Some(&a_new));
        let report = analyzer.end_analysis(Some(&a_old), Some(&a_new));
        assert!(report.is_empty());

        analyzer.close().unwrap();
    }
}
