use crate::config::Config;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Image extensions (lower-case) that count as assets
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "svg"];

/// Errors that make a scan root unusable
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Cannot read directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type of a discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Markdown,
    Mdx,
    Image,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy();
        let lower = file_name.to_lowercase();

        if lower.ends_with(".mdx") {
            Some(FileType::Mdx)
        } else if lower.ends_with(".md") {
            Some(FileType::Markdown)
        } else if image_extension(&file_name).is_some() {
            Some(FileType::Image)
        } else {
            None
        }
    }

    /// Check if this is a markup document
    pub fn is_document(&self) -> bool {
        matches!(self, FileType::Markdown | FileType::Mdx)
    }
}

/// Lower-cased extension of `file_name` if it is an allowed image extension.
///
/// The extension is whatever follows the last `.`. Names without a dot, names
/// ending in a dot and dotfiles like `.png` have no extension.
pub fn image_extension(file_name: &str) -> Option<String> {
    let dot = file_name.rfind('.')?;
    if dot == 0 || dot == file_name.len() - 1 {
        return None;
    }

    let ext = file_name[dot + 1..].to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// File finder for walking documentation and image trees
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Make sure `root` is an existing, readable directory
    pub fn validate_root(root: &Path) -> Result<(), WalkError> {
        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WalkError::NotFound(root.to_path_buf()))
            }
            Err(source) => {
                return Err(WalkError::Unreadable {
                    path: root.to_path_buf(),
                    source,
                })
            }
        };

        if !metadata.is_dir() {
            return Err(WalkError::NotADirectory(root.to_path_buf()));
        }

        fs::read_dir(root).map_err(|source| WalkError::Unreadable {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Find all regular files of the given kind under `root`, sorted by path
    pub fn find_files<F>(&self, root: &Path, keep: F) -> Result<Vec<PathBuf>, WalkError>
    where
        F: Fn(FileType) -> bool,
    {
        Self::validate_root(root)?;
        debug!("Scanning for files in: {}", root.display());

        let respect = self.config.respect_ignore_files;
        let walker = WalkBuilder::new(root)
            .hidden(respect)
            .git_ignore(respect)
            .git_global(respect)
            .git_exclude(respect)
            .ignore(respect)
            .parents(respect)
            .require_git(false)
            .follow_links(self.config.follow_links)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable subdirectories and symlink loops end up here
                    warn!("Skipping entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if !Self::is_regular_file(&entry) {
                continue;
            }

            if self.config.should_exclude(path) {
                trace!("Excluding: {}", path.display());
                continue;
            }

            match FileType::from_path(path) {
                Some(file_type) if keep(file_type) => {
                    trace!("Found {:?}: {}", file_type, path.display());
                    files.push(path.to_path_buf());
                }
                _ => {}
            }
        }

        files.sort();
        debug!("Found {} files under {}", files.len(), root.display());
        Ok(files)
    }

    /// Regular files, including unfollowed links that point at one.
    /// Directory links are only descended with `follow_links`.
    fn is_regular_file(entry: &ignore::DirEntry) -> bool {
        if entry.path_is_symlink() {
            return match fs::metadata(entry.path()) {
                Ok(metadata) => metadata.is_file(),
                Err(e) => {
                    warn!("Skipping broken link {}: {}", entry.path().display(), e);
                    false
                }
            };
        }
        entry.file_type().map(|t| t.is_file()).unwrap_or(false)
    }

    /// Find all .md and .mdx documents
    pub fn find_documents(&self, root: &Path) -> Result<Vec<PathBuf>, WalkError> {
        self.find_files(root, |t| t.is_document())
    }

    /// Find all image files with an allowed extension
    pub fn find_images(&self, root: &Path) -> Result<Vec<PathBuf>, WalkError> {
        self.find_files(root, |t| t == FileType::Image)
    }
}
