use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::KeyPolicy;

/// Configuration for a documentation resource check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for .md/.mdx documents
    pub docs_root: PathBuf,

    /// Directory scanned for image files
    pub images_root: PathBuf,

    /// Directory the result lists are written into
    pub output_dir: PathBuf,

    /// Directory that absolute references (`/img/a.png`) resolve against.
    /// Defaults to the docs root.
    pub site_root: Option<PathBuf>,

    /// How paths are turned into comparable keys
    pub key_policy: KeyPolicy,

    /// Patterns to exclude from both scans
    pub exclude: Vec<String>,

    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Honor .gitignore/.ignore files and skip hidden entries
    pub respect_ignore_files: bool,

    /// Run the two scans in parallel
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("docs"),
            images_root: PathBuf::from("docs/img"),
            output_dir: PathBuf::from("."),
            site_root: None,
            key_policy: KeyPolicy::default(),
            exclude: vec![],
            follow_links: false,
            respect_ignore_files: false,
            parallel: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents, path.extension().and_then(|e| e.to_str()).unwrap_or(""))
    }

    fn parse(contents: &str, extension: &str) -> Result<Self> {
        match extension {
            "yml" | "yaml" => serde_yaml::from_str(contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(contents) {
                    Ok(config)
                } else {
                    toml::from_str(contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".docresources.yml",
            ".docresources.yaml",
            ".docresources.toml",
            "docresources.yml",
            "docresources.yaml",
            "docresources.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Root that `/`-prefixed references resolve against
    pub fn effective_site_root(&self) -> &Path {
        self.site_root.as_deref().unwrap_or(self.docs_root.as_path())
    }

    /// Check if a path matches one of the exclusion patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Simple glob matching for patterns like "*.draft.md" or "**/node_modules/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return text.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        if !pattern.contains('/') {
            let file_name = text.rsplit('/').next().unwrap_or(text);
            return file_name.starts_with(prefix);
        }
    }

    // "**/drafts/**" matches "drafts" as a whole directory name anywhere
    if let Some(dir_name) = pattern.strip_prefix("**/").and_then(|p| p.strip_suffix("/**")) {
        let dir_pattern = format!("/{}/", dir_name);
        return text.contains(&dir_pattern) || text.starts_with(&dir_pattern[1..]);
    }

    // "**/legacy.md" matches that trailing path anywhere
    if let Some(tail) = pattern.strip_prefix("**/") {
        return text == tail || text.ends_with(&format!("/{}", tail));
    }

    // "website/versioned/**" matches everything below that directory
    if let Some(dir) = pattern.strip_suffix("/**") {
        return text.starts_with(&format!("{}/", dir)) || text.contains(&format!("/{}/", dir));
    }

    text == pattern || text.ends_with(&format!("/{}", pattern))
}
