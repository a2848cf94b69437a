use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::error::CouponSearchError;

/// An in-memory sparse index over one sorted coupon file.
///
/// Built once at process start by a single sequential pass; immutable and
/// shared by all concurrent searches for the process lifetime.
#[derive(Debug)]
pub(crate) struct PartialIndex {
    path: PathBuf,
    first_key: Option<String>,
    last_key: Option<String>,
    chunk_size: usize,
    chunk_keys: Vec<String>,
    chunk_offsets: Vec<u64>,
}

impl PartialIndex {
    /// Scans `path` once, sampling every `chunk_size`-th non-empty line.
    ///
    /// An empty file is permitted and yields a degenerate index with no
    /// sampled keys; callers must treat that as "not found" rather than
    /// an error.
    pub(crate) fn build(path: PathBuf, chunk_size: usize) -> Result<PartialIndex, CouponSearchError> {
        let file = File::open(&path)
            .map_err(|source| CouponSearchError::IndexBuild { path: path.clone(), source })?;
        let mut reader = BufReader::new(file);

        let mut offset: u64 = 0;
        let mut first_key: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut chunk_keys = Vec::new();
        let mut chunk_offsets = Vec::new();
        let mut non_empty_count: u64 = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let line_start = offset;
            let bytes_read = reader.read_until(b'\n', &mut buf)
                .map_err(|source| CouponSearchError::IndexBuild { path: path.clone(), source })?;
            if bytes_read == 0 {
                break;
            }
            offset += bytes_read as u64;

            let trimmed = String::from_utf8_lossy(&buf).trim().to_string();
            if trimmed.is_empty() {
                continue;
            }

            if first_key.is_none() {
                first_key = Some(trimmed.clone());
            }
            last_key = Some(trimmed.clone());

            if non_empty_count % chunk_size as u64 == 0 {
                chunk_keys.push(trimmed);
                chunk_offsets.push(line_start);
            }
            non_empty_count += 1;
        }

        Ok(
            PartialIndex {
                path,
                first_key,
                last_key,
                chunk_size,
                chunk_keys,
                chunk_offsets,
            }
        )
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub(crate) fn chunk_keys(&self) -> &[String] {
        &self.chunk_keys
    }

    pub(crate) fn chunk_offsets(&self) -> &[u64] {
        &self.chunk_offsets
    }

    pub(crate) fn first_key(&self) -> Option<&str> {
        self.first_key.as_deref()
    }

    /// True iff `query` falls within `[first_key, last_key]` and a probe is
    /// worth attempting. An empty file never contains a candidate range.
    pub(crate) fn in_range(&self, query: &str) -> bool {
        match (&self.first_key, &self.last_key) {
            (Some(first), Some(last)) => first.as_str() <= query && query <= last.as_str(),
            _ => false,
        }
    }
}
