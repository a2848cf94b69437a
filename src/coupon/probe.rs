use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::coupon::partial_index::PartialIndex;
use crate::error::CouponSearchError;

/// Chunk-bounded binary search for `query` inside the file backing `index`.
///
/// Peak memory is bounded at `2 * chunk_size` lines regardless of file size.
/// `cancelled` is checked once per line read; on cancellation the probe
/// abandons and reports "not found" without an error, and bumps
/// `cancelled_count` so the coordinator can expose whether the cancellation
/// signal was actually observed by any probe, not just raised.
pub(crate) fn probe(index: &PartialIndex, query: &str, cancelled: &AtomicBool, cancelled_count: &AtomicUsize) -> Result<bool, CouponSearchError> {
    if index.chunk_keys().is_empty() {
        return Ok(false);
    }

    let mut i = index.chunk_keys().partition_point(|key| key.as_str() < query);
    if i > 0 {
        i -= 1;
    }
    if i >= index.chunk_offsets().len() {
        return Ok(false);
    }

    let path = index.path();
    let file = File::open(path)
        .map_err(|source| CouponSearchError::FileIo { path: path.clone(), source })?;
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(index.chunk_offsets()[i]))
        .map_err(|source| CouponSearchError::FileIo { path: path.clone(), source })?;

    let window_limit = index.chunk_size() * 2;
    let mut window = Vec::with_capacity(window_limit);
    let mut buf = Vec::new();

    while window.len() < window_limit {
        if cancelled.load(Ordering::Relaxed) {
            cancelled_count.fetch_add(1, Ordering::Relaxed);
            return Ok(false);
        }

        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf)
            .map_err(|source| CouponSearchError::FileIo { path: path.clone(), source })?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = String::from_utf8_lossy(&buf).trim().to_string();
        if trimmed.is_empty() {
            continue;
        }
        window.push(trimmed);
    }

    Ok(window.binary_search_by(|candidate| candidate.as_str().cmp(query)).is_ok())
}
