//! Dense score maps and their reassembly from per-band pieces.
//!
//! A score map holds one `f32` per valid template placement in row-major
//! order: `width = img_width - tpl_width + 1` and, for a whole image,
//! `height = img_height - tpl_height + 1`. Higher scores are better for every
//! method.

mod reduce;

pub use reduce::concat_rows;

use crate::util::{BandMatchError, BandMatchResult};

/// Row-major grid of placement scores.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScoreMap {
    /// Wraps a row-major buffer of exactly `width * height` scores.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> BandMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .ok_or(BandMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(BandMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a map with no rows, the result of a band that owns no placements.
    pub fn empty(width: usize) -> Self {
        Self {
            width,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Returns the number of placement columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of placement rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the map has no scores.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the scores in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns the scores of placement row `y`.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    pub(crate) fn into_data(self) -> Vec<f32> {
        self.data
    }
}
