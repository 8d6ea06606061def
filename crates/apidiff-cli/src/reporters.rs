//! Built-in reporters offered by the CLI. The core only defines the
//! [`Reporter`] interface; these two formats are the CLI's own.

use apidiff_core::{AnalysisError, Report, Reporter};
use serde::Serialize;

/// Human-readable one-line-per-difference output to stdout.
#[derive(Default)]
pub struct TextReporter;

impl Reporter for TextReporter {
    fn report(&mut self, report: &Report) -> Result<(), AnalysisError> {
        let old_name = report.old.as_ref().map(|e| e.full_name()).unwrap_or("<none>");
        let new_name = report.new.as_ref().map(|e| e.full_name()).unwrap_or("<none>");
        for difference in &report.differences {
            println!(
                "[{}] {} <-> {}: {}",
                difference.code(),
                old_name,
                new_name,
                difference.description()
            );
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonDifference {
    code: String,
    name: String,
    description: String,
    old: Option<String>,
    new: Option<String>,
    classifications: Vec<(String, String)>,
}

/// Accumulates every delivered report and emits one JSON array on
/// [`close`](Reporter::close), since a single JSON document can't be
/// streamed incrementally without becoming invalid mid-run.
#[derive(Default)]
pub struct JsonReporter {
    differences: Vec<JsonDifference>,
}

impl Reporter for JsonReporter {
    fn report(&mut self, report: &Report) -> Result<(), AnalysisError> {
        let old_name = report.old.as_ref().map(|e| e.full_name().to_string());
        let new_name = report.new.as_ref().map(|e| e.full_name().to_string());
        for difference in &report.differences {
            self.differences.push(JsonDifference {
                code: difference.code().to_string(),
                name: difference.name().to_string(),
                description: difference.description().to_string(),
                old: old_name.clone(),
                new: new_name.clone(),
                classifications: difference
                    .classifications()
                    .iter()
                    .map(|(dimension, severity)| (dimension.as_str().to_string(), format!("{severity:?}")))
                    .collect(),
            });
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), AnalysisError> {
        let json = serde_json::to_string_pretty(&self.differences)
            .map_err(|e| AnalysisError::ReporterFailure {
                reporter: "json",
                source: Box::new(e),
            })?;
        println!("{json}");
        Ok(())
    }
}
