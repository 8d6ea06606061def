//! The top-level pluggable source of API trees and reports.

use std::sync::Arc;

use crate::api::Api;
use crate::config::Configuration;
use crate::difference::Report;
use crate::element::Element;
use crate::error::AnalysisError;

/// Builds the old and new API trees out of a pair of [`Api`]s and drives the
/// comparison, yielding one [`Report`] per analyzed pair.
///
/// Implementors typically delegate the tree-walk mechanics to a
/// [`DifferenceAnalyzer`](crate::default_analyzer::DefaultDifferenceAnalyzer)
/// built over their own [`Element`] trees; `Analyzer` itself only commits to
/// "given these two APIs, produce reports."
pub trait Analyzer: Send + Sync {
    /// Called once, after reporters are initialized and before any tree is
    /// built.
    fn initialize(&mut self, config: &Configuration) -> Result<(), AnalysisError> {
        let _ = config;
        Ok(())
    }

    /// Builds the tree rooted at the given API's primary archives. Called
    /// once per side (old, new) per [`Engine::analyze`](crate::engine::Engine::analyze)
    /// invocation.
    fn build_tree(&self, api: &Arc<Api>) -> Result<Arc<Element>, AnalysisError>;

    /// Compares the previously built `old` and `new` trees and returns every
    /// report raised, before transforms or filters run.
    fn analyze(&mut self, old: &Arc<Element>, new: &Arc<Element>) -> Result<Vec<Report>, AnalysisError>;

    /// Best-effort teardown hook, called once after `analyze` regardless of
    /// outcome. Failures here are logged and swallowed — see
    /// [`Engine::analyze`](crate::engine::Engine::analyze) — since a cleanup
    /// failure after results have already been produced shouldn't fail the
    /// whole run.
    fn force_cleanup(&self) -> Result<(), AnalysisError> {
        Ok(())
    }
}
