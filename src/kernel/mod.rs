//! Correlation kernels: the per-placement scoring primitive.
//!
//! A kernel scores every valid placement of a template inside an image view.
//! Each score depends only on the pixels under its own window, so scanning a
//! row band (with enough trailing context rows) produces exactly the rows the
//! whole-image scan would.

use crate::score::ScoreMap;
use crate::template::TemplatePlan;
use crate::util::{BandMatchError, BandMatchResult};
use crate::ImageView;

/// Correlation method. Every method is oriented so that higher is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// Correlation coefficient: `Σ (T - mean T) · I`.
    #[default]
    Ccoeff,
    /// Normalized correlation coefficient (ZNCC), in `[-1, 1]`.
    CcoeffNormed,
    /// Raw cross-correlation: `Σ T · I`.
    Ccorr,
    /// Cross-correlation normalized by template and window energy.
    CcorrNormed,
    /// Negated sum of squared differences; an exact match scores 0.
    Sqdiff,
}

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Correlation method.
    pub method: Method,
    /// Minimum window variance (or energy) for normalized methods; windows at
    /// or below it score `-inf`.
    pub min_var_i: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            method: Method::default(),
            min_var_i: 1e-8,
        }
    }
}

/// Raw sums accumulated over one template window.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WindowSums {
    pub(crate) dot: f32,
    pub(crate) sum_i: f32,
    pub(crate) sum_i2: f32,
    pub(crate) sse: f32,
}

impl WindowSums {
    /// Turns the window sums into a score for `params.method`.
    pub(crate) fn score(self, plan: &TemplatePlan, params: ScanParams) -> f32 {
        let score = match params.method {
            Method::Ccoeff | Method::Ccorr => self.dot,
            Method::Sqdiff => -self.sse,
            Method::CcoeffNormed => {
                let n = plan.len() as f32;
                let var_i = self.sum_i2 - (self.sum_i * self.sum_i) / n;
                if var_i <= params.min_var_i {
                    return f32::NEG_INFINITY;
                }
                self.dot / (plan.var_t() * var_i).sqrt()
            }
            Method::CcorrNormed => {
                if self.sum_i2 <= params.min_var_i {
                    return f32::NEG_INFINITY;
                }
                self.dot / (plan.energy() * self.sum_i2).sqrt()
            }
        };
        if score.is_nan() {
            f32::NEG_INFINITY
        } else {
            score
        }
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Placements where the template does not fit score `-inf`.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f32;

    /// Scores every valid placement of `plan` inside `image`.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> BandMatchResult<ScoreMap> {
        let (width, height) = placement_dims(image, plan)?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(Self::score_at(image, plan, x, y, params));
            }
        }
        ScoreMap::new(data, width, height)
    }
}

/// Returns the placement grid size, or an error if the template does not fit.
pub fn placement_dims(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
) -> BandMatchResult<(usize, usize)> {
    let (img_width, img_height) = (image.width(), image.height());
    let (tpl_width, tpl_height) = (plan.width(), plan.height());
    if img_width < tpl_width || img_height < tpl_height {
        return Err(BandMatchError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width + 1, img_height - tpl_height + 1))
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(not(feature = "simd"))]
pub use scalar::ScalarKernel as DefaultKernel;
#[cfg(feature = "simd")]
pub use simd::SimdKernel as DefaultKernel;

/// Scores every placement with the default kernel for this build.
pub fn correlate(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> BandMatchResult<ScoreMap> {
    <DefaultKernel as Kernel>::scan_full(image, plan, params)
}
