use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::coupon::partial_index::PartialIndex;
use crate::error::CouponSearchError;

const COUPON_FILE_PREFIX: &str = "couponbase";

/// The collection of PartialIndexes, ordered by `first_key`. Immutable after
/// construction; shared read-only by every concurrent search.
pub(crate) struct IndexStore {
    indexes: Vec<Arc<PartialIndex>>,
}

impl IndexStore {
    pub(crate) fn build(root: &Path, chunk_size: usize) -> Result<IndexStore, CouponSearchError> {
        let mut paths = discover_coupon_files(root)?;
        paths.sort();

        let mut indexes = Vec::with_capacity(paths.len());
        for path in paths {
            indexes.push(Arc::new(PartialIndex::build(path, chunk_size)?));
        }
        indexes.sort_by(|a, b| a.first_key().unwrap_or("").cmp(b.first_key().unwrap_or("")));

        Ok(IndexStore { indexes })
    }

    pub(crate) fn indexes(&self) -> &[Arc<PartialIndex>] {
        &self.indexes
    }
}

fn discover_coupon_files(root: &Path) -> Result<Vec<PathBuf>, CouponSearchError> {
    let entries = std::fs::read_dir(root)
        .map_err(|source| CouponSearchError::IndexBuild { path: root.to_path_buf(), source })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|source| CouponSearchError::IndexBuild { path: root.to_path_buf(), source })?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with(COUPON_FILE_PREFIX) {
            paths.push(entry.path());
        }
    }

    if paths.is_empty() {
        return Err(CouponSearchError::NoFiles(root.to_path_buf()));
    }

    Ok(paths)
}
