use std::collections::BTreeSet;

use super::keys::ResourceKey;

/// Images on disk that no document references (`present - referenced`)
pub fn find_unused(
    referenced: &BTreeSet<ResourceKey>,
    present: &BTreeSet<ResourceKey>,
) -> BTreeSet<ResourceKey> {
    present.difference(referenced).cloned().collect()
}

/// References with no image on disk (`referenced - present`)
pub fn find_missing(
    referenced: &BTreeSet<ResourceKey>,
    present: &BTreeSet<ResourceKey>,
) -> BTreeSet<ResourceKey> {
    referenced.difference(present).cloned().collect()
}

/// Both scans and their differences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub referenced: BTreeSet<ResourceKey>,
    pub present: BTreeSet<ResourceKey>,
    pub unused: BTreeSet<ResourceKey>,
    pub missing: BTreeSet<ResourceKey>,
}

impl Reconciliation {
    pub fn new(referenced: BTreeSet<ResourceKey>, present: BTreeSet<ResourceKey>) -> Self {
        let unused = find_unused(&referenced, &present);
        let missing = find_missing(&referenced, &present);
        Self {
            referenced,
            present,
            unused,
            missing,
        }
    }
}
