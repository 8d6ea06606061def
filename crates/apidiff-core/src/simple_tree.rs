//! A minimal in-memory [`Analyzer`], for tests and embedding examples that
//! hand-build their trees rather than compiling real archives.

use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::api::Api;
use crate::check::Check;
use crate::config::Configuration;
use crate::default_analyzer::{DefaultDifferenceAnalyzer, DifferenceAnalyzer};
use crate::difference::Report;
use crate::element::{Comparator, Element};
use crate::error::AnalysisError;
use crate::filter::{CompositeFilter, ElementFilter};
use crate::traversal::{check_no_duplicate_siblings, traverse};

/// An [`Analyzer`] whose tree-building is a plain closure supplied by the
/// caller, and whose comparison delegates to a [`DefaultDifferenceAnalyzer`]
/// over a fixed check set. Useful for unit and integration tests that
/// exercise the engine without a real bytecode- or source-reading analyzer.
pub struct SimpleTreeAnalyzer<B>
where
    B: Fn(&Arc<Api>) -> Arc<Element> + Send + Sync,
{
    build: B,
    comparator: Comparator,
    filter: CompositeFilter,
    difference_analyzer: DefaultDifferenceAnalyzer,
}

impl<B> SimpleTreeAnalyzer<B>
where
    B: Fn(&Arc<Api>) -> Arc<Element> + Send + Sync,
{
    pub fn new(build: B, comparator: Comparator, checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            build,
            comparator,
            filter: CompositeFilter::default(),
            difference_analyzer: DefaultDifferenceAnalyzer::new(checks),
        }
    }

    pub fn with_filter(mut self, filter: CompositeFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl<B> Analyzer for SimpleTreeAnalyzer<B>
where
    B: Fn(&Arc<Api>) -> Arc<Element> + Send + Sync,
{
    fn initialize(&mut self, config: &Configuration) -> Result<(), AnalysisError> {
        self.difference_analyzer.initialize(config);
        Ok(())
    }

    fn build_tree(&self, api: &Arc<Api>) -> Result<Arc<Element>, AnalysisError> {
        Ok((self.build)(api))
    }

    fn analyze(&mut self, old: &Arc<Element>, new: &Arc<Element>) -> Result<Vec<Report>, AnalysisError> {
        check_no_duplicate_siblings(std::slice::from_ref(old), &self.comparator)?;
        check_no_duplicate_siblings(std::slice::from_ref(new), &self.comparator)?;

        self.difference_analyzer.set_environments(old.api(), new.api());
        let mut guard = crate::default_analyzer::DifferenceAnalyzerGuard::open(&mut self.difference_analyzer)?;

        let mut reports = Vec::new();
        traverse(
            std::slice::from_ref(old),
            std::slice::from_ref(new),
            &self.comparator,
            &self.filter,
            &mut *guard,
            &mut |report| reports.push(report),
        );

        guard.close()?;

        Ok(reports)
    }
}
