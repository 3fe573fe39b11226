//! Error types for bandmatch.

use thiserror::Error;

/// Result alias for bandmatch operations.
pub type BandMatchResult<T> = std::result::Result<T, BandMatchError>;

/// Coarse classification of a failure, mirroring where in a run it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad inputs or parameters, detected before any correlation work.
    Input,
    /// A worker or the score reassembly failed.
    Worker,
    /// The annotated result could not be written.
    Output,
}

/// Errors that can occur when running bandmatch.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BandMatchError {
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer cannot hold the requested view.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Region of interest does not fit in the image.
    #[error("roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template does not fit inside the search image.
    #[error(
        "template {tpl_width}x{tpl_height} larger than image {img_width}x{img_height}"
    )]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template statistics make the selected method undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Worker count must be at least one.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    /// An input raster could not be opened or decoded.
    #[error("failed to read image {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {reason}")]
    PoolBuild { reason: String },
    /// A worker returned an error or panicked while scanning a band.
    #[error("worker for band {band} failed: {reason}")]
    WorkerFailed { band: usize, reason: String },
    /// Partial score maps disagree on their width.
    #[error("partial score map width {got} does not match {expected}")]
    ScoreWidthMismatch { expected: usize, got: usize },
    /// There is no placement to choose from.
    #[error("score map is empty")]
    EmptyScoreMap,
    /// The annotated result could not be written.
    #[error("failed to write {path}: {reason}")]
    OutputWrite { path: String, reason: String },
}

impl BandMatchError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. }
            | Self::InvalidStride { .. }
            | Self::BufferTooSmall { .. }
            | Self::RoiOutOfBounds { .. }
            | Self::TemplateTooLarge { .. }
            | Self::DegenerateTemplate { .. }
            | Self::InvalidWorkerCount
            | Self::ImageIo { .. } => ErrorKind::Input,
            Self::PoolBuild { .. }
            | Self::WorkerFailed { .. }
            | Self::ScoreWidthMismatch { .. }
            | Self::EmptyScoreMap => ErrorKind::Worker,
            Self::OutputWrite { .. } => ErrorKind::Output,
        }
    }
}
