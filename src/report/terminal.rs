use crate::checker::CheckReport;
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Also list references that have no image on disk
    show_missing: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_missing: true }
    }

    pub fn with_missing(mut self, show: bool) -> Self {
        self.show_missing = show;
        self
    }

    pub fn report(&self, report: &CheckReport) -> Result<()> {
        let r = &report.reconciliation;

        println!();
        if r.unused.is_empty() {
            println!("{}", "No unused images found.".green().bold());
        } else {
            println!(
                "{}",
                format!("Found {} unused images:", r.unused.len()).yellow().bold()
            );
            for key in &r.unused {
                println!("  {} {}", "•".yellow(), key);
            }
        }

        if self.show_missing && !r.missing.is_empty() {
            println!();
            println!(
                "{}",
                format!("{} references have no matching image:", r.missing.len())
                    .red()
                    .bold()
            );
            for key in &r.missing {
                println!("  {} {}", "•".red(), key);
            }
        }

        if !report.skipped.is_empty() {
            println!();
            println!(
                "{}",
                format!("Skipped {} unreadable documents:", report.skipped.len()).yellow()
            );
            for skipped in &report.skipped {
                println!(
                    "  {} {}",
                    skipped.path.display(),
                    format!("({})", skipped.reason).dimmed()
                );
            }
        }

        self.print_summary(report);
        Ok(())
    }

    fn print_summary(&self, report: &CheckReport) {
        let r = &report.reconciliation;

        println!();
        println!("{}", "Summary:".bold());
        println!("  Documents scanned:   {}", report.documents_scanned);
        println!("  Referenced images:   {}", r.referenced.len());
        println!("  Images on disk:      {}", r.present.len());
        println!("  Unused images:       {}", r.unused.len().to_string().yellow());
        println!("  Missing references:  {}", r.missing.len().to_string().red());
        println!("  Key policy:          {}", report.policy.display_name().dimmed());
        println!();
        println!(
            "Results written to: {}",
            report.output_dir.display().to_string().cyan()
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
