//! Resource keys and the normalization policy that produces them
//!
//! References found in documents and files found on disk are only
//! comparable after both went through the same [`KeyNormalizer`]. Paths are
//! resolved lexically: `.` and `..` are folded without touching the
//! filesystem, so a reference through a missing directory still resolves.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Normalized identifier of an image asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResourceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// How a resolved path is turned into a [`ResourceKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Path relative to the image root (`guides/setup/step1.png`)
    #[default]
    RelativePath,
    /// Last folder and file name only (`setup/step1.png`).
    /// Same-named files in folders with the same name collide.
    FolderAndFile,
}

impl KeyPolicy {
    pub fn display_name(&self) -> &'static str {
        match self {
            KeyPolicy::RelativePath => "relative-path",
            KeyPolicy::FolderAndFile => "folder-and-file",
        }
    }
}

/// Fold `.` and `..` segments without filesystem access.
///
/// `..` directly under a root is dropped; leading `..` of a relative path
/// is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    parts.iter().collect()
}

/// Lexical path of `path` relative to `base`. Both must be normalized and
/// absolute; `None` when they share no root (different drives).
pub fn relative_path(path: &Path, base: &Path) -> Option<PathBuf> {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();

    let common = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component);
    }
    Some(relative)
}

/// Join path components with `/` regardless of the host separator
fn to_slash_string(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Maps filesystem paths to resource keys under one [`KeyPolicy`]
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    policy: KeyPolicy,
    base_dir: PathBuf,
    images_root: PathBuf,
}

impl KeyNormalizer {
    /// `base_dir` is the absolute directory relative paths are taken from
    /// (normally the working directory).
    pub fn new(policy: KeyPolicy, base_dir: &Path, images_root: &Path) -> Self {
        let base_dir = normalize_lexically(base_dir);
        let images_root = absolutize(&base_dir, images_root);
        Self {
            policy,
            base_dir,
            images_root,
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    /// Absolute, lexically normalized form of `path`
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        absolutize(&self.base_dir, path)
    }

    /// Key for a file path. `None` if the path does not name a file.
    pub fn key_for(&self, path: &Path) -> Option<ResourceKey> {
        let path = self.absolutize(path);
        let file_name = match path.components().last()? {
            Component::Normal(name) => name.to_string_lossy().into_owned(),
            _ => return None,
        };

        let key = match self.policy {
            KeyPolicy::RelativePath => match relative_path(&path, &self.images_root) {
                Some(relative) if relative.as_os_str().is_empty() => return None,
                Some(relative) => to_slash_string(&relative),
                None => to_slash_string(&path),
            },
            KeyPolicy::FolderAndFile => {
                let folder = path
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|f| f.to_string_lossy().into_owned());
                match folder {
                    Some(folder) => format!("{}/{}", folder, file_name),
                    None => file_name,
                }
            }
        };

        Some(ResourceKey(key))
    }
}

fn absolutize(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base_dir.join(path))
    }
}
