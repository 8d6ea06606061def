//! Terminal consumers of (possibly transformed) reports.

use crate::config::Configuration;
use crate::difference::Report;
use crate::error::AnalysisError;

/// A terminal consumer of non-empty reports, delivered in registration
/// order. Reporters should self-handle failures; one that returns `Err`
/// aborts the whole analysis.
pub trait Reporter: Send + Sync {
    /// Called once, before analysis begins. Reporters are initialized
    /// first, ahead of analyzers and transforms, so a reporter can fail
    /// fast before any tree is built.
    fn initialize(&mut self, config: &Configuration) -> Result<(), AnalysisError> {
        let _ = config;
        Ok(())
    }

    fn report(&mut self, report: &Report) -> Result<(), AnalysisError>;

    /// Called once after the whole analysis completes, regardless of
    /// whether every report was delivered successfully.
    fn close(&mut self) -> Result<(), AnalysisError> {
        Ok(())
    }
}
