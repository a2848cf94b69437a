use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for the coupon search subsystem and its startup wiring.
///
/// Startup variants (`Config`, `NoFiles`, `IndexBuild`, `Unsupported`,
/// `NotImplemented`) are fatal: the process logs the cause and aborts.
/// `FileIo` is query-time and non-fatal: it is aggregated alongside a
/// `SearchOutcome` and never flips `found` to `true`.
#[derive(Debug, Error)]
pub enum CouponSearchError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no coupon files found under {0}")]
    NoFiles(PathBuf),

    #[error("failed to build partial index for {path}: {source}")]
    IndexBuild {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reader type is not implemented: {0}")]
    NotImplemented(String),

    #[error("unsupported reader type: {0}")]
    Unsupported(String),
}
