mod json;
mod terminal;
mod writer;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;
pub use writer::{
    render_key_list, write_key_list, OutputFiles, ResultWriter, WriteError, ALL_IMAGES_FILE,
    UNUSED_IMAGES_FILE, USED_RESOURCES_FILE,
};

use crate::checker::CheckReport;
use miette::Result;
use std::path::PathBuf;

/// Output format for the console report
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Reporter for printing check results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_missing: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_missing: true,
        }
    }

    /// Whether the terminal report lists references without an image
    pub fn with_missing(mut self, show: bool) -> Self {
        self.show_missing = show;
        self
    }

    /// Report the check results
    pub fn report(&self, report: &CheckReport) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_missing(self.show_missing)
                .report(report),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(report),
        }
    }
}
