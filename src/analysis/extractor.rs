//! Image reference extraction from Markdown/MDX documents
//!
//! Extraction is a plain pattern scan over the raw text. Code fences, HTML
//! comments and escaped brackets are not special-cased, so an image shown
//! inside a fenced example still counts as a reference.

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::keys::{KeyNormalizer, ResourceKey};
use crate::discovery::{image_extension, FileFinder, WalkError};

/// `![alt](path)`, `<img ... src="path">` and `<Image ... src='path'>`
pub const REFERENCE_PATTERN: &str = r#"!\[.*?\]\((.*?)\)|<img\s+[^>]*src=["'](.*?)["'][^>]*>|<Image\s+[^>]*src=["'](.*?)["'][^>]*>"#;

/// Markup form a reference was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceForm {
    Markdown,
    HtmlImg,
    ImageComponent,
}

/// A captured, not yet normalized reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReference<'t> {
    pub form: ReferenceForm,
    pub target: &'t str,
}

/// A document that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning a documentation tree
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// Keys referenced by at least one document
    pub references: BTreeSet<ResourceKey>,
    /// Number of documents read successfully
    pub documents_scanned: usize,
    /// Documents that were skipped, sorted by path
    pub skipped: Vec<SkippedDocument>,
}

/// Collects the image keys referenced by a documentation tree
pub struct ReferenceExtractor {
    pattern: Regex,
    normalizer: KeyNormalizer,
    site_root: PathBuf,
}

impl ReferenceExtractor {
    /// `site_root` is where `/`-prefixed references resolve
    pub fn new(normalizer: KeyNormalizer, site_root: &Path) -> Self {
        let pattern = Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid");
        let site_root = normalizer.absolutize(site_root);
        Self {
            pattern,
            normalizer,
            site_root,
        }
    }

    /// All references in `text`, left to right, non-overlapping
    pub fn raw_references<'t>(&self, text: &'t str) -> Vec<RawReference<'t>> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let (form, target) = if let Some(m) = caps.get(1) {
                    (ReferenceForm::Markdown, m)
                } else if let Some(m) = caps.get(2) {
                    (ReferenceForm::HtmlImg, m)
                } else {
                    (ReferenceForm::ImageComponent, caps.get(3)?)
                };
                Some(RawReference {
                    form,
                    target: target.as_str(),
                })
            })
            .collect()
    }

    /// Resolve a cleaned reference written in `document` to an absolute path
    pub fn resolve(&self, document: &Path, target: &str) -> PathBuf {
        match target.strip_prefix('/') {
            Some(rooted) => self.site_root.join(rooted),
            None => {
                let document = self.normalizer.absolutize(document);
                let dir = document.parent().unwrap_or(self.site_root.as_path());
                self.normalizer.absolutize(&dir.join(target))
            }
        }
    }

    /// Keys referenced by one document's text
    pub fn extract_from_text(&self, document: &Path, text: &str) -> BTreeSet<ResourceKey> {
        self.raw_references(text)
            .into_iter()
            .filter_map(|raw| {
                let Some(target) = clean_reference(&raw) else {
                    trace!("Ignoring reference {:?} in {}", raw.target, document.display());
                    return None;
                };
                self.normalizer.key_for(&self.resolve(document, &target))
            })
            .collect()
    }

    /// Scan every .md/.mdx document under `root`.
    ///
    /// Unreadable documents are logged and skipped; only an unusable root
    /// is an error.
    pub fn extract(
        &self,
        finder: &FileFinder,
        root: &Path,
        parallel: bool,
    ) -> Result<ExtractionResult, WalkError> {
        let documents = finder.find_documents(root)?;
        debug!("Extracting references from {} documents", documents.len());

        let read = |path: &PathBuf| match std::fs::read_to_string(path) {
            Ok(text) => Ok(self.extract_from_text(path, &text)),
            Err(e) => {
                warn!("Cannot read file \"{}\": {}", path.display(), e);
                Err(SkippedDocument {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            }
        };

        let outcomes: Vec<Result<BTreeSet<ResourceKey>, SkippedDocument>> = if parallel {
            documents.par_iter().map(read).collect()
        } else {
            documents.iter().map(read).collect()
        };

        let mut result = ExtractionResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(keys) => {
                    result.documents_scanned += 1;
                    result.references.extend(keys);
                }
                Err(skipped) => result.skipped.push(skipped),
            }
        }

        debug!(
            "Found {} distinct references ({} documents skipped)",
            result.references.len(),
            result.skipped.len()
        );
        Ok(result)
    }
}

/// Turn a captured target into a local path, or `None` if it is not one.
///
/// Markdown destinations lose their `<...>` wrapper and optional title.
/// External URLs, `data:` URIs and bare fragments are dropped, as is a
/// `?query` or `#fragment` after the image extension.
pub fn clean_reference(raw: &RawReference) -> Option<String> {
    let mut target = raw.target.trim();

    if raw.form == ReferenceForm::Markdown {
        if let Some(inner) = target.strip_prefix('<').and_then(|t| t.split_once('>')) {
            target = inner.0.trim();
        } else {
            target = strip_title(target);
        }
    }

    if target.is_empty() || target.starts_with('#') || target.starts_with("//") || has_scheme(target) {
        return None;
    }

    let target = strip_query_suffix(target).replace('\\', "/");

    let last = target.rsplit('/').next().unwrap_or("");
    if matches!(last, "" | "." | "..") {
        return None;
    }

    Some(target)
}

/// Drop a Markdown title: whitespace followed by `"`, `'` or `(`.
/// Spaces inside the path itself are kept.
fn strip_title(target: &str) -> &str {
    target
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .find(|(idx, _)| target[*idx..].trim_start().starts_with(['"', '\'', '(']))
        .map(|(idx, _)| target[..idx].trim_end())
        .unwrap_or(target)
}

/// Cut a `?query` or `#fragment` that directly follows an image extension.
/// Any other `?` or `#` is part of the file name (`C#logo.png`).
fn strip_query_suffix(target: &str) -> &str {
    target
        .match_indices(['?', '#'])
        .map(|(idx, _)| &target[..idx])
        .find(|head| {
            let last = head.rsplit(['/', '\\']).next().unwrap_or("");
            image_extension(last).is_some()
        })
        .unwrap_or(target)
}

/// `https:`, `data:`, `mailto:` and the like. Single letters are drive
/// letters, not schemes.
fn has_scheme(target: &str) -> bool {
    match target.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
