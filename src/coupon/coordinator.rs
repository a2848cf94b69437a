use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use crate::coupon::partial_index::PartialIndex;
use crate::coupon::probe::probe;
use crate::error::CouponSearchError;

/// A coupon is accepted once it appears in at least this many distinct
/// files. Preserved verbatim from the source system; the motivation
/// (redundancy policy vs. domain artifact) is not documented upstream.
pub(crate) const MATCH_THRESHOLD: usize = 2;

pub struct SearchOutcome {
    pub found: bool,
    pub errors: Vec<CouponSearchError>,
    /// Number of probes that observed the cancellation signal and abandoned
    /// early. Exposed so callers (and tests) can assert the "remaining
    /// probes observe cancellation" property from spec.md §8 scenario 3
    /// end-to-end; zero is a valid outcome when the threshold is reached
    /// only after every launched probe had already completed.
    pub probes_cancelled: usize,
}

/// Fans out one per-file probe per range-pruned candidate, bounded to at
/// most `pool_size` concurrent workers draining a shared queue. Cancels
/// in-flight probes as soon as `found_count` reaches [`MATCH_THRESHOLD`].
pub(crate) fn search(indexes: &[std::sync::Arc<PartialIndex>], query: &str, pool_size: usize) -> SearchOutcome {
    let mut candidates = VecDeque::new();
    for index in indexes {
        if index.in_range(query) {
            candidates.push_back(index.clone());
        } else {
            log::debug!("skipping {:?}, query out of [first_key, last_key] range", index.path());
        }
    }

    if candidates.is_empty() {
        return SearchOutcome { found: false, errors: Vec::new(), probes_cancelled: 0 };
    }

    let worker_count = std::cmp::min(pool_size.max(1), candidates.len());
    let queue = Mutex::new(candidates);
    let cancelled = AtomicBool::new(false);
    let cancelled_count = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<bool, CouponSearchError>>();

    thread::scope(|scope| {
        for _ in 0..worker_count {
            let queue = &queue;
            let cancelled = &cancelled;
            let cancelled_count = &cancelled_count;
            let tx = tx.clone();
            scope.spawn(move || {
                loop {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    let next = queue.lock().unwrap().pop_front();
                    let index = match next {
                        Some(index) => index,
                        None => break,
                    };
                    let result = probe(&index, query, cancelled, cancelled_count);
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut found_count = 0usize;
        let mut errors = Vec::new();
        for result in rx {
            match result {
                Ok(true) => {
                    found_count += 1;
                    if found_count >= MATCH_THRESHOLD {
                        cancelled.store(true, Ordering::Relaxed);
                    }
                }
                Ok(false) => {}
                Err(e) => errors.push(e),
            }
        }

        SearchOutcome {
            found: found_count >= MATCH_THRESHOLD,
            errors,
            probes_cancelled: cancelled_count.load(Ordering::Relaxed),
        }
    })
}
