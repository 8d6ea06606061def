//! Error taxonomy.

use std::error::Error as StdError;

/// Fatal failures an [`Engine::analyze`](crate::engine::Engine::analyze) run
/// can surface. Individual differences are never errors, only data.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// A component was constructed with a missing required dependency or an
    /// invalid configuration. A programmer error, never recovered.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Building a tree or compiling an archive failed.
    #[error("analyzer failed to build a tree")]
    AnalyzerFailure(#[source] Box<dyn StdError + Send + Sync>),

    /// A check raised during visit or close.
    #[error("check `{check}` failed")]
    CheckFailure {
        check: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A transform raised while rewriting a difference.
    #[error("transform `{transform}` failed")]
    TransformFailure {
        transform: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A reporter raised; reporters are expected to self-handle recoverable
    /// failures, so reaching this always aborts the analysis.
    #[error("reporter `{reporter}` failed")]
    ReporterFailure {
        reporter: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Two distinct siblings compared equal under the tree's comparator.
    /// The comparator must impose a total order with no ties among
    /// siblings; detecting this is left to the analyzer that built the
    /// tree, since co-iteration itself has no cheap way to notice a
    /// three-way tie.
    #[error("duplicate sibling: {description}")]
    DuplicateSibling { description: String },
}
