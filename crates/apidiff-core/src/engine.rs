//! Top-level orchestration: assembling components and running a full
//! old-vs-new comparison end to end.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analyzer::Analyzer;
use crate::api::Api;
use crate::archive::Archive;
use crate::config::Configuration;
use crate::difference::Report;
use crate::error::AnalysisError;
use crate::reporter::Reporter;
use crate::transform::{apply_chain, Transform};

/// Builds an [`Engine`] from an explicit component set. Prefer
/// [`EngineBuilder::from_registry`] when components come from an
/// [`ExtensionRegistry`](crate::registry::ExtensionRegistry) instead of
/// being listed by hand.
pub struct EngineBuilder {
    analyzers: Vec<Box<dyn Analyzer>>,
    transforms: Vec<Box<dyn Transform>>,
    reporters: Vec<Box<dyn Reporter>>,
    configuration: Configuration,
}

impl EngineBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            analyzers: Vec::new(),
            transforms: Vec::new(),
            reporters: Vec::new(),
            configuration,
        }
    }

    pub fn from_registry(registry: &dyn crate::registry::ExtensionRegistry, configuration: Configuration) -> Self {
        Self {
            analyzers: registry.analyzers(),
            transforms: registry.transforms(),
            reporters: registry.reporters(),
            configuration,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Initializes reporters, then analyzers, then transforms with the
    /// configuration, in that order, and returns the assembled [`Engine`].
    pub fn build(mut self) -> Result<Engine, AnalysisError> {
        if self.analyzers.is_empty() {
            return Err(AnalysisError::ConfigurationError(
                "at least one analyzer must be registered".to_string(),
            ));
        }

        for reporter in &mut self.reporters {
            reporter.initialize(&self.configuration)?;
        }
        for analyzer in &mut self.analyzers {
            analyzer.initialize(&self.configuration)?;
        }
        for transform in &mut self.transforms {
            transform.initialize(&self.configuration);
        }

        Ok(Engine {
            analyzers: self.analyzers,
            transforms: self.transforms,
            reporters: self.reporters,
            configuration: self.configuration,
        })
    }
}

/// The assembled pipeline: analyzers, transforms and reporters bound to one
/// [`Configuration`]. `analyze` may be called more than once; each call is
/// an independent run, with no state persisted between them.
pub struct Engine {
    analyzers: Vec<Box<dyn Analyzer>>,
    transforms: Vec<Box<dyn Transform>>,
    reporters: Vec<Box<dyn Reporter>>,
    #[allow(dead_code)]
    configuration: Configuration,
}

impl Engine {
    /// Runs every registered analyzer over `(old, new)`, in registration
    /// order, each analyzer's reports delivered entirely before the next
    /// analyzer begins. Analyzers are isolated from one another: a failure
    /// from one still lets every other analyzer run and get its
    /// `force_cleanup` called, and the first error encountered is what's
    /// ultimately returned.
    pub fn analyze(
        &mut self,
        old_primary: Vec<Archive>,
        old_supplementary: Vec<Archive>,
        new_primary: Vec<Archive>,
        new_supplementary: Vec<Archive>,
    ) -> Result<(), AnalysisError> {
        let old_api = Arc::new(Api::new(old_primary, old_supplementary));
        let new_api = Arc::new(Api::new(new_primary, new_supplementary));

        let outcome = self.run_analyzers(&old_api, &new_api);

        for reporter in &mut self.reporters {
            reporter.close()?;
        }

        outcome
    }

    fn run_analyzers(&mut self, old_api: &Arc<Api>, new_api: &Arc<Api>) -> Result<(), AnalysisError> {
        let mut first_error = None;

        for analyzer in &mut self.analyzers {
            let result = (|| -> Result<(), AnalysisError> {
                let old_tree = analyzer.build_tree(old_api)?;
                let new_tree = analyzer.build_tree(new_api)?;
                let reports = analyzer.analyze(&old_tree, &new_tree)?;
                info!(count = reports.len(), "analyzer produced reports");
                for report in reports {
                    dispatch(&self.transforms, &mut self.reporters, &report)?;
                }
                Ok(())
            })();

            if let Err(error) = analyzer.force_cleanup() {
                warn!(%error, "analyzer force_cleanup failed");
            }

            if let Err(error) = result {
                warn!(%error, "analyzer failed, continuing with remaining analyzers");
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Runs a non-empty report through the transform chain and then every
/// reporter, dropping it entirely if transforms leave no differences.
fn dispatch(
    transforms: &[Box<dyn Transform>],
    reporters: &mut [Box<dyn Reporter>],
    report: &Report,
) -> Result<(), AnalysisError> {
    if report.is_empty() {
        return Ok(());
    }

    let mut transformed = Vec::with_capacity(report.differences.len());
    for difference in &report.differences {
        if let Some(kept) = apply_chain(transforms, report.old.as_deref(), report.new.as_deref(), difference.clone()) {
            transformed.push(kept);
        }
    }

    if transformed.is_empty() {
        return Ok(());
    }

    let final_report = Report::new(report.old.clone(), report.new.clone(), transformed);
    for reporter in reporters {
        reporter.report(&final_report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;
    use crate::difference::Difference;
    use crate::element::{Comparator, Element, ElementKind};
    use crate::simple_tree::SimpleTreeAnalyzer;
    use std::sync::Mutex;

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
                vec![Difference::new("ADDED", "Added", "added")]
            } else {
                Vec::new()
            }
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        codes: Arc<Mutex<Vec<String>>>,
    }
    impl Reporter for RecordingReporter {
        fn report(&mut self, report: &Report) -> Result<(), AnalysisError> {
            self.codes
                .lock()
                .unwrap()
                .extend(report.differences.iter().map(|d| d.code().to_string()));
            Ok(())
        }
    }

    /// Builds a root with children `["a", "c"]` for the old-side api (named
    /// `"old"`) and `["a", "b", "c"]` for the new-side api, so comparing the
    /// two reports exactly one addition, `"b"`.
    fn build_scenario_one(api: &Arc<Api>) -> Arc<Element> {
        let names: &[&str] = if api.primary()[0].name() == "old" {
            &["a", "c"]
        } else {
            &["a", "b", "c"]
        };
        let api = api.clone();
        Element::build_root(ElementKind::Class, "root", api.clone(), Archive::new("root", vec![]), |weak| {
            names
                .iter()
                .map(|n| Element::build_child(ElementKind::Class, *n, api.clone(), Archive::new(*n, vec![]), weak, |_| vec![]))
                .collect()
        })
    }

    #[test]
    fn end_to_end_scenario_one() {
        let comparator: Comparator = Arc::new(|a: &Element, b: &Element| a.full_name().cmp(b.full_name()));
        let analyzer = SimpleTreeAnalyzer::new(build_scenario_one, comparator, vec![Box::new(AddedCheck)]);

        let reporter = RecordingReporter::default();
        let codes = reporter.codes.clone();

        let mut engine = EngineBuilder::new(Configuration::default())
            .with_analyzer(Box::new(analyzer))
            .with_reporter(Box::new(reporter))
            .build()
            .unwrap();

        engine
            .analyze(vec![Archive::new("old", vec![])], vec![], vec![Archive::new("new", vec![])], vec![])
            .unwrap();

        assert_eq!(*codes.lock().unwrap(), vec!["ADDED".to_string()]);
    }

    struct FailingAnalyzer;
    impl Analyzer for FailingAnalyzer {
        fn build_tree(&self, _api: &Arc<Api>) -> Result<Arc<Element>, AnalysisError> {
            Err(AnalysisError::AnalyzerFailure(Box::<dyn std::error::Error + Send + Sync>::from("boom")))
        }
        fn analyze(&mut self, _old: &Arc<Element>, _new: &Arc<Element>) -> Result<Vec<Report>, AnalysisError> {
            unreachable!("build_tree always fails first")
        }
        fn force_cleanup(&self) -> Result<(), AnalysisError> {
            Ok(())
        }
    }

    #[test]
    fn one_analyzer_failing_does_not_stop_the_next_from_running() {
        let comparator: Comparator = Arc::new(|a: &Element, b: &Element| a.full_name().cmp(b.full_name()));
        let ok_analyzer = SimpleTreeAnalyzer::new(build_scenario_one, comparator, vec![Box::new(AddedCheck)]);

        let reporter = RecordingReporter::default();
        let codes = reporter.codes.clone();

        let mut engine = EngineBuilder::new(Configuration::default())
            .with_analyzer(Box::new(FailingAnalyzer))
            .with_analyzer(Box::new(ok_analyzer))
            .with_reporter(Box::new(reporter))
            .build()
            .unwrap();

        let outcome = engine.analyze(vec![Archive::new("old", vec![])], vec![], vec![Archive::new("new", vec![])], vec![]);

        assert!(outcome.is_err());
        assert_eq!(*codes.lock().unwrap(), vec!["ADDED".to_string()]);
    }
}
