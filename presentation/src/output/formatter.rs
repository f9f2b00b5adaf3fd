//! Output formatter trait

use crate::output::summary::{JsonSummary, TextSummary};
use crew_application::{RunReport, RunTasksError};
use crew_domain::OutputFormat;

/// Renders the end-of-run result
pub trait ReportFormatter {
    /// Format a run that completed every task
    fn format(&self, report: &RunReport) -> String;

    /// Format a run that stopped on a fatal engine error
    fn format_failure(&self, error: &RunTasksError) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextSummary),
        OutputFormat::Json => Box::new(JsonSummary),
    }
}
