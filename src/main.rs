use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use docresourcechecker::{CheckReport, Config, KeyPolicy, ReportFormat, Reporter, ResourceChecker};

/// docresourcechecker - Find unused images in Markdown/MDX documentation
#[derive(Parser, Debug)]
#[command(name = "docresourcechecker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory with .md/.mdx documents [default: docs]
    docs: Option<PathBuf>,

    /// Directory with image files [default: docs/img]
    images: Option<PathBuf>,

    /// Directory for used_resources.txt, all_images.txt and unused_images.txt [default: .]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How paths are compared
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Directory that absolute references like /img/a.png resolve against
    #[arg(long, value_name = "DIR")]
    site_root: Option<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Follow symbolic links (link loops are detected and skipped)
    #[arg(long)]
    follow_links: bool,

    /// Honor .gitignore/.ignore files and skip hidden files
    #[arg(long)]
    respect_ignore: bool,

    /// Scan documents and images in parallel
    #[arg(long)]
    parallel: bool,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Do not list references that have no image on disk
    #[arg(long)]
    no_missing: bool,

    /// Exit with status 1 when unused images are found
    #[arg(long)]
    fail_on_unused: bool,

    /// Prompt for the three directories
    #[arg(short, long)]
    interactive: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    /// Path relative to the image root
    RelativePath,
    /// Last folder and file name
    FolderAndFile,
}

impl From<PolicyArg> for KeyPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::RelativePath => KeyPolicy::RelativePath,
            PolicyArg::FolderAndFile => KeyPolicy::FolderAndFile,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("docresourcechecker v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&cli)?;
    if cli.interactive {
        prompt_directories(&mut config)?;
    }

    let report = run_check(&config, cli.quiet)?;

    Reporter::new(cli.format.clone().into(), cli.report.clone())
        .with_missing(!cli.no_missing)
        .report(&report)?;

    if cli.fail_on_unused && !report.reconciliation.unused.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        let cwd = std::env::current_dir().into_diagnostic()?;
        Config::from_default_locations(&cwd)?
    };

    // Override with CLI arguments
    if let Some(docs) = &cli.docs {
        config.docs_root = docs.clone();
    }
    if let Some(images) = &cli.images {
        config.images_root = images.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(site_root) = &cli.site_root {
        config.site_root = Some(site_root.clone());
    }
    if let Some(policy) = cli.policy {
        config.key_policy = policy.into();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    config.follow_links |= cli.follow_links;
    config.respect_ignore_files |= cli.respect_ignore;
    config.parallel |= cli.parallel;

    Ok(config)
}

fn prompt_directories(config: &mut Config) -> Result<()> {
    use dialoguer::{theme::ColorfulTheme, Input};

    let theme = ColorfulTheme::default();
    let ask = |prompt: &str, current: &PathBuf| -> Result<PathBuf> {
        let answer: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .default(current.display().to_string())
            .interact_text()
            .into_diagnostic()?;
        Ok(PathBuf::from(answer.trim()))
    };

    config.docs_root = ask("Documentation directory", &config.docs_root)?;
    config.images_root = ask("Image directory", &config.images_root)?;
    config.output_dir = ask("Output directory", &config.output_dir)?;
    Ok(())
}

fn run_check(config: &Config, quiet: bool) -> Result<CheckReport> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .into_diagnostic()?,
    );
    spinner.set_message("Scanning documentation and images...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let checker = ResourceChecker::new(config).into_diagnostic()?;
    let result = checker.run();
    spinner.finish_and_clear();

    let report = result.into_diagnostic()?;

    if !report.skipped.is_empty() {
        eprintln!(
            "{}: {} document(s) could not be read and were skipped",
            "Warning".yellow(),
            report.skipped.len()
        );
    }

    info!("Check finished in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(report)
}
