//! Shared utility helpers.

pub mod error;

pub use error::{BandMatchError, BandMatchResult, ErrorKind};

/// Number of processing units available to this process, at least 1.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
