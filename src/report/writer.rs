use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::analysis::{Reconciliation, ResourceKey};

pub const USED_RESOURCES_FILE: &str = "used_resources.txt";
pub const ALL_IMAGES_FILE: &str = "all_images.txt";
pub const UNUSED_IMAGES_FILE: &str = "unused_images.txt";

/// Errors while writing the result lists
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of the three written lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFiles {
    pub used_resources: PathBuf,
    pub all_images: PathBuf,
    pub unused_images: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            used_resources: dir.join(USED_RESOURCES_FILE),
            all_images: dir.join(ALL_IMAGES_FILE),
            unused_images: dir.join(UNUSED_IMAGES_FILE),
        }
    }
}

/// One key per line in byte order, every line ending in `\n`
pub fn render_key_list(keys: &BTreeSet<ResourceKey>) -> String {
    let mut out = String::new();
    for key in keys {
        out.push_str(key.as_str());
        out.push('\n');
    }
    out
}

/// Write a sorted key list to `path`, replacing any existing file
pub fn write_key_list(path: &Path, keys: &BTreeSet<ResourceKey>) -> Result<(), WriteError> {
    fs::write(path, render_key_list(keys)).map_err(|source| WriteError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes used_resources.txt, all_images.txt and unused_images.txt
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn write(&self, reconciliation: &Reconciliation) -> Result<OutputFiles, WriteError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let files = OutputFiles::in_dir(&self.output_dir);
        write_key_list(&files.used_resources, &reconciliation.referenced)?;
        write_key_list(&files.all_images, &reconciliation.present)?;
        write_key_list(&files.unused_images, &reconciliation.unused)?;

        debug!("Wrote result lists to {}", self.output_dir.display());
        Ok(files)
    }
}
