use std::path::PathBuf;

pub use crate::coupon::coordinator::SearchOutcome;
use crate::coupon::coordinator;
use crate::coupon::index_store::IndexStore;
use crate::error::CouponSearchError;

/// Single capability exposed to the order-creation path: does `query`
/// appear in at least two of the backing coupon files?
pub trait CouponReader: Send + Sync {
    fn search(&self, query: &str) -> SearchOutcome;
}

/// Coupon reader for files that live on spinning disk: partial indexes are
/// built once at startup, and each probe trades extra seeks for a bounded
/// in-memory window instead of holding the whole file resident.
pub struct HddCouponReader {
    index_store: IndexStore,
    pool_size: usize,
}

impl HddCouponReader {
    pub fn new(root_path: PathBuf, chunk_size: usize, pool_size: usize) -> Result<HddCouponReader, CouponSearchError> {
        let index_store = IndexStore::build(&root_path, chunk_size)?;

        log::info!("partial indexes built for {} coupon files", index_store.indexes().len());
        for index in index_store.indexes() {
            log::info!("partial index ready, path: {:?}", index.path());
        }

        Ok(HddCouponReader { index_store, pool_size })
    }
}

impl CouponReader for HddCouponReader {
    fn search(&self, query: &str) -> SearchOutcome {
        coordinator::search(self.index_store.indexes(), query, self.pool_size)
    }
}

