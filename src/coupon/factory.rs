use std::path::PathBuf;
use std::sync::Arc;

use crate::coupon::reader::{CouponReader, HddCouponReader};
use crate::error::CouponSearchError;

pub const HDD_READER: &str = "hdd";
pub const SSD_READER: &str = "ssd";

/// Selects a [`CouponReader`] implementation by tag.
///
/// `"ssd"` is reserved: solid-state media allows a different access
/// pattern (e.g. direct binary search over on-disk record offsets without
/// a staged in-memory window) that this crate does not implement yet.
pub fn create_reader(reader_type: &str, root_path: &str, chunk_size: usize, pool_size: usize) -> Result<Arc<dyn CouponReader>, CouponSearchError> {
    match reader_type {
        HDD_READER => {
            let reader = HddCouponReader::new(PathBuf::from(root_path), chunk_size, pool_size)?;
            Ok(Arc::new(reader))
        }
        SSD_READER => Err(CouponSearchError::NotImplemented(SSD_READER.to_string())),
        other => Err(CouponSearchError::Unsupported(other.to_string())),
    }
}
