//! Component discovery.
//!
//! The core never hard-codes a discovery mechanism; it only consumes
//! iterables of constructed components through [`ExtensionRegistry`].
//! Discovery happens once, at builder time.

use crate::analyzer::Analyzer;
use crate::check::Check;
use crate::filter::ElementFilter;
use crate::reporter::Reporter;
use crate::transform::Transform;

/// Source of the five externally-pluggable component kinds. Implementors
/// decide how components come into existence — explicit registration,
/// `inventory`-collected statics, or anything else.
///
/// `checks()` and `filters()` are for embedders building their own
/// [`Analyzer`] over [`crate::default_analyzer::DefaultDifferenceAnalyzer`]:
/// the core has no concrete analyzer of its own to hand them to, so these
/// two accessors exist purely so such an analyzer doesn't have to invent its
/// own discovery story.
pub trait ExtensionRegistry {
    fn analyzers(&self) -> Vec<Box<dyn Analyzer>>;
    fn checks(&self) -> Vec<Box<dyn Check>>;
    fn transforms(&self) -> Vec<Box<dyn Transform>>;
    fn reporters(&self) -> Vec<Box<dyn Reporter>>;
    fn filters(&self) -> Vec<Box<dyn ElementFilter>>;
}

/// An explicitly-built registry, for embedders that construct their
/// component set programmatically (e.g. [`crate::engine::EngineBuilder`]
/// used directly) rather than relying on compile-time collection.
#[derive(Default)]
pub struct ManualRegistry {
    analyzers: Vec<Box<dyn Fn() -> Box<dyn Analyzer> + Send + Sync>>,
    checks: Vec<Box<dyn Fn() -> Box<dyn Check> + Send + Sync>>,
    transforms: Vec<Box<dyn Fn() -> Box<dyn Transform> + Send + Sync>>,
    reporters: Vec<Box<dyn Fn() -> Box<dyn Reporter> + Send + Sync>>,
    filters: Vec<Box<dyn Fn() -> Box<dyn ElementFilter> + Send + Sync>>,
}

impl ManualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analyzer(mut self, factory: impl Fn() -> Box<dyn Analyzer> + Send + Sync + 'static) -> Self {
        self.analyzers.push(Box::new(factory));
        self
    }

    pub fn with_check(mut self, factory: impl Fn() -> Box<dyn Check> + Send + Sync + 'static) -> Self {
        self.checks.push(Box::new(factory));
        self
    }

    pub fn with_transform(mut self, factory: impl Fn() -> Box<dyn Transform> + Send + Sync + 'static) -> Self {
        self.transforms.push(Box::new(factory));
        self
    }

    pub fn with_reporter(mut self, factory: impl Fn() -> Box<dyn Reporter> + Send + Sync + 'static) -> Self {
        self.reporters.push(Box::new(factory));
        self
    }

    pub fn with_filter(mut self, factory: impl Fn() -> Box<dyn ElementFilter> + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(factory));
        self
    }
}

impl ExtensionRegistry for ManualRegistry {
    fn analyzers(&self) -> Vec<Box<dyn Analyzer>> {
        self.analyzers.iter().map(|f| f()).collect()
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        self.checks.iter().map(|f| f()).collect()
    }

    fn transforms(&self) -> Vec<Box<dyn Transform>> {
        self.transforms.iter().map(|f| f()).collect()
    }

    fn reporters(&self) -> Vec<Box<dyn Reporter>> {
        self.reporters.iter().map(|f| f()).collect()
    }

    fn filters(&self) -> Vec<Box<dyn ElementFilter>> {
        self.filters.iter().map(|f| f()).collect()
    }
}

/// Factory entries collected at compile time via [`inventory`]. A plugin
/// crate submits one of these per component it provides; the CLI (and any
/// other auto-discovering embedder) turns all submissions into an
/// [`ExtensionRegistry`] without either side knowing about the other.
pub struct AnalyzerFactory(pub fn() -> Box<dyn Analyzer>);
pub struct CheckFactory(pub fn() -> Box<dyn Check>);
pub struct TransformFactory(pub fn() -> Box<dyn Transform>);
pub struct ReporterFactory(pub fn() -> Box<dyn Reporter>);
pub struct FilterFactory(pub fn() -> Box<dyn ElementFilter>);

inventory::collect!(AnalyzerFactory);
inventory::collect!(CheckFactory);
inventory::collect!(TransformFactory);
inventory::collect!(ReporterFactory);
inventory::collect!(FilterFactory);

/// Registry sourced from whatever factory statics were linked into the
/// binary. Used by `apidiff-cli`, which auto-discovers every extension
/// linked into it rather than requiring each one to be named on the command
/// line.
#[derive(Default)]
pub struct InventoryRegistry;

impl ExtensionRegistry for InventoryRegistry {
    fn analyzers(&self) -> Vec<Box<dyn Analyzer>> {
        inventory::iter::<AnalyzerFactory>.into_iter().map(|f| (f.0)()).collect()
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        inventory::iter::<CheckFactory>.into_iter().map(|f| (f.0)()).collect()
    }

    fn transforms(&self) -> Vec<Box<dyn Transform>> {
        inventory::iter::<TransformFactory>.into_iter().map(|f| (f.0)()).collect()
    }

    fn reporters(&self) -> Vec<Box<dyn Reporter>> {
        inventory::iter::<ReporterFactory>.into_iter().map(|f| (f.0)()).collect()
    }

    fn filters(&self) -> Vec<Box<dyn ElementFilter>> {
        inventory::iter::<FilterFactory>.into_iter().map(|f| (f.0)()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::difference::Report;
    use crate::element::Element;
    use crate::error::AnalysisError;
    use std::sync::Arc;

    struct NoopReporter;
    impl Reporter for NoopReporter {
        fn report(&mut self, _report: &Report) -> Result<(), AnalysisError> {
            Ok(())
        }
    }

    struct NoopAnalyzer;
    impl Analyzer for NoopAnalyzer {
        fn build_tree(&self, _api: &Arc<Api>) -> Result<Arc<Element>, AnalysisError> {
            unimplemented!("not exercised by this test")
        }
        fn analyze(&mut self, _old: &Arc<Element>, _new: &Arc<Element>) -> Result<Vec<Report>, AnalysisError> {
            Ok(Vec::new())
        }
    }

    struct NoopCheck;
    impl Check for NoopCheck {
        fn codes(&self) -> &'static [&'static str] {
            &[]
        }
        fn interest(&self) -> &'static [crate::element::ElementKind] {
            &[]
        }
    }

    struct AcceptAllFilter;
    impl ElementFilter for AcceptAllFilter {
        fn applies(&self, _element: Option<&crate::element::Element>) -> bool {
            true
        }
        fn should_descend_into(&self, _element: &crate::element::Element) -> bool {
            true
        }
    }

    #[test]
    fn manual_registry_invokes_factories_independently() {
        let registry = ManualRegistry::new()
            .with_reporter(|| Box::new(NoopReporter))
            .with_analyzer(|| Box::new(NoopAnalyzer))
            .with_check(|| Box::new(NoopCheck))
            .with_filter(|| Box::new(AcceptAllFilter));

        assert_eq!(registry.reporters().len(), 1);
        assert_eq!(registry.analyzers().len(), 1);
        assert_eq!(registry.checks().len(), 1);
        assert_eq!(registry.filters().len(), 1);
        assert_eq!(registry.transforms().len(), 0);
    }
}
