use crate::analysis::{ResourceKey, SkippedDocument};
use crate::checker::CheckReport;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::OutputFiles;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &CheckReport) -> Result<()> {
        let json = render(report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

/// Pretty-printed JSON form of a check
pub fn render(report: &CheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from_check(report))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    key_policy: &'static str,
    summary: JsonSummary,
    unused: Vec<&'a ResourceKey>,
    missing: Vec<&'a ResourceKey>,
    skipped: &'a [SkippedDocument],
    output_dir: &'a Path,
    outputs: &'a OutputFiles,
}

#[derive(Serialize)]
struct JsonSummary {
    documents_scanned: usize,
    documents_skipped: usize,
    referenced: usize,
    present: usize,
    unused: usize,
    missing: usize,
}

impl<'a> JsonReport<'a> {
    fn from_check(report: &'a CheckReport) -> Self {
        let r = &report.reconciliation;
        Self {
            version: env!("CARGO_PKG_VERSION"),
            key_policy: report.policy.display_name(),
            summary: JsonSummary {
                documents_scanned: report.documents_scanned,
                documents_skipped: report.skipped.len(),
                referenced: r.referenced.len(),
                present: r.present.len(),
                unused: r.unused.len(),
                missing: r.missing.len(),
            },
            unused: r.unused.iter().collect(),
            missing: r.missing.iter().collect(),
            skipped: &report.skipped,
            output_dir: &report.output_dir,
            outputs: &report.outputs,
        }
    }
}
