//! Template statistics precomputed once per run and shared read-only by all
//! workers.

use crate::image::ImageView;
use crate::kernel::Method;
use crate::util::{BandMatchError, BandMatchResult};

const MIN_ENERGY: f64 = 1e-8;

/// Precomputed buffers and statistics for correlation scoring.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f32,
    raw: Vec<f32>,
    zero_mean: Vec<f32>,
    energy: f32,
    var_t: f32,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> BandMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(BandMatchError::InvalidDimensions { width, height })?;

        let mut raw = Vec::with_capacity(count);
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(BandMatchError::BufferTooSmall {
                needed: (y + 1) * tpl.stride(),
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
                raw.push(value as f32);
            }
        }

        let mean = sum / count as f64;
        let var_t = (sum_sq - sum * mean).max(0.0);
        let zero_mean = raw.iter().map(|&v| (v as f64 - mean) as f32).collect();

        Ok(Self {
            width,
            height,
            mean: mean as f32,
            raw,
            zero_mean,
            energy: sum_sq as f32,
            var_t: var_t as f32,
        })
    }

    /// Rejects templates for which `method` has no defined score.
    pub fn check_method(&self, method: Method) -> BandMatchResult<()> {
        match method {
            Method::CcoeffNormed if (self.var_t as f64) <= MIN_ENERGY => {
                Err(BandMatchError::DegenerateTemplate {
                    reason: "zero variance",
                })
            }
            Method::CcorrNormed if (self.energy as f64) <= MIN_ENERGY => {
                Err(BandMatchError::DegenerateTemplate {
                    reason: "zero energy",
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of template pixels.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the template has no pixels.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Returns the template intensities as `f32` in row-major order.
    pub fn raw(&self) -> &[f32] {
        &self.raw
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f32] {
        &self.zero_mean
    }

    /// Returns the sum of squared intensities.
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Returns the sum of squared zero-mean intensities.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the buffer correlated against image windows by `method`.
    pub(crate) fn weights(&self, method: Method) -> &[f32] {
        match method {
            Method::Ccoeff | Method::CcoeffNormed => &self.zero_mean,
            Method::Ccorr | Method::CcorrNormed | Method::Sqdiff => &self.raw,
        }
    }
}
