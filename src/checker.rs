//! The full check: validate roots, scan both trees, reconcile, write lists

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::analysis::{
    AssetEnumerator, ExtractionResult, KeyNormalizer, KeyPolicy, Reconciliation,
    ReferenceExtractor, ResourceKey, SkippedDocument,
};
use crate::config::Config;
use crate::discovery::{FileFinder, WalkError};
use crate::report::{OutputFiles, ResultWriter, WriteError};

/// Errors that abort a check
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
    #[error("Documentation root is unusable: {0}")]
    DocsRoot(#[source] WalkError),
    #[error("Image root is unusable: {0}")]
    ImagesRoot(#[source] WalkError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Outcome of a completed check
#[derive(Debug)]
pub struct CheckReport {
    pub policy: KeyPolicy,
    pub reconciliation: Reconciliation,
    pub documents_scanned: usize,
    pub skipped: Vec<SkippedDocument>,
    pub output_dir: PathBuf,
    pub outputs: OutputFiles,
}

/// Runs one documentation resource check for a [`Config`]
pub struct ResourceChecker<'a> {
    config: &'a Config,
    base_dir: PathBuf,
}

impl<'a> ResourceChecker<'a> {
    /// Checker resolving relative paths against the working directory
    pub fn new(config: &'a Config) -> Result<Self, CheckError> {
        let base_dir = std::env::current_dir().map_err(CheckError::WorkingDirectory)?;
        Ok(Self::with_base_dir(config, &base_dir))
    }

    /// Checker resolving relative paths against `base_dir`
    pub fn with_base_dir(config: &'a Config, base_dir: &Path) -> Self {
        Self {
            config,
            base_dir: base_dir.to_path_buf(),
        }
    }

    fn normalizer(&self) -> KeyNormalizer {
        KeyNormalizer::new(self.config.key_policy, &self.base_dir, &self.config.images_root)
    }

    /// Scan both trees without writing anything
    pub fn scan(&self) -> Result<(ExtractionResult, BTreeSet<ResourceKey>), CheckError> {
        let normalizer = self.normalizer();
        let docs_root = normalizer.absolutize(&self.config.docs_root);
        let images_root = normalizer.images_root().to_path_buf();

        FileFinder::validate_root(&docs_root).map_err(CheckError::DocsRoot)?;
        FileFinder::validate_root(&images_root).map_err(CheckError::ImagesRoot)?;

        let finder = FileFinder::new(self.config);
        let site_root = normalizer.absolutize(self.config.effective_site_root());
        let extractor = ReferenceExtractor::new(normalizer.clone(), &site_root);
        let enumerator = AssetEnumerator::new(normalizer);

        let extract = || {
            info!("Scanning Markdown files in \"{}\"...", docs_root.display());
            extractor.extract(&finder, &docs_root, self.config.parallel)
        };
        let enumerate = || {
            info!("Scanning image files in \"{}\"...", images_root.display());
            enumerator.enumerate(&finder, &images_root)
        };

        let (extraction, assets) = if self.config.parallel {
            rayon::join(extract, enumerate)
        } else {
            (extract(), enumerate())
        };

        Ok((
            extraction.map_err(CheckError::DocsRoot)?,
            assets.map_err(CheckError::ImagesRoot)?,
        ))
    }

    /// Scan, reconcile and write the three result lists
    pub fn run(&self) -> Result<CheckReport, CheckError> {
        let (extraction, assets) = self.scan()?;
        let reconciliation = Reconciliation::new(extraction.references, assets);

        info!(
            "{} referenced, {} on disk, {} unused, {} missing",
            reconciliation.referenced.len(),
            reconciliation.present.len(),
            reconciliation.unused.len(),
            reconciliation.missing.len()
        );

        let output_dir = self.normalizer().absolutize(&self.config.output_dir);
        let outputs = ResultWriter::new(output_dir.clone()).write(&reconciliation)?;

        Ok(CheckReport {
            policy: self.config.key_policy,
            reconciliation,
            documents_scanned: extraction.documents_scanned,
            skipped: extraction.skipped,
            output_dir,
            outputs,
        })
    }
}
