//! Reference extraction, asset enumeration and reconciliation

mod enumerator;
mod extractor;
mod keys;
mod reconcile;

pub use enumerator::AssetEnumerator;
pub use extractor::{
    clean_reference, ExtractionResult, RawReference, ReferenceExtractor, ReferenceForm,
    SkippedDocument, REFERENCE_PATTERN,
};
pub use keys::{normalize_lexically, relative_path, KeyNormalizer, KeyPolicy, ResourceKey};
pub use reconcile::{find_missing, find_unused, Reconciliation};
