use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::keys::{KeyNormalizer, ResourceKey};
use crate::discovery::{FileFinder, WalkError};

/// Collects the keys of all image files under an image root
pub struct AssetEnumerator {
    normalizer: KeyNormalizer,
}

impl AssetEnumerator {
    pub fn new(normalizer: KeyNormalizer) -> Self {
        Self { normalizer }
    }

    /// Keys of every png/jpg/jpeg/gif/svg file under `root`
    pub fn enumerate(&self, finder: &FileFinder, root: &Path) -> Result<BTreeSet<ResourceKey>, WalkError> {
        let images = finder.find_images(root)?;

        let keys: BTreeSet<ResourceKey> = images
            .iter()
            .filter_map(|path| self.normalizer.key_for(path))
            .collect();

        debug!("Found {} images ({} distinct keys)", images.len(), keys.len());
        Ok(keys)
    }
}
