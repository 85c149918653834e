//! docresourcechecker - Find unused images in Markdown/MDX documentation
//!
//! This library compares the images referenced by a documentation tree with
//! the images present on disk.
//!
//! # Architecture
//!
//! The check pipeline consists of:
//! 1. **File Discovery** - Walk the docs and image roots
//! 2. **Reference Extraction** - Pattern-match `![..](..)`, `<img src>` and
//!    `<Image src>` in .md/.mdx files
//! 3. **Asset Enumeration** - Collect png/jpg/jpeg/gif/svg files
//! 4. **Reconciliation** - Set differences between both sides
//! 5. **Reporting** - Sorted result lists plus a terminal or JSON summary
//!
//! Both sides are turned into [`ResourceKey`]s by the same
//! [`KeyNormalizer`], so a reference and a file match only if their keys
//! are byte-for-byte equal.

pub mod analysis;
pub mod checker;
pub mod config;
pub mod discovery;
pub mod report;

pub use analysis::{
    find_missing, find_unused, AssetEnumerator, KeyNormalizer, KeyPolicy, Reconciliation,
    ReferenceExtractor, ResourceKey,
};
pub use checker::{CheckError, CheckReport, ResourceChecker};
pub use config::Config;
pub use discovery::FileFinder;
pub use report::{ReportFormat, Reporter, ResultWriter};
