//! Scalar reference kernel.

use crate::kernel::{Kernel, Method, ScanParams, WindowSums};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar kernel covering every correlation method.
pub struct ScalarKernel;

impl ScalarKernel {
    fn window_sums(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        method: Method,
    ) -> Option<WindowSums> {
        let tpl_width = plan.width();
        let weights = plan.weights(method);
        let want_sse = method == Method::Sqdiff;

        let mut sums = WindowSums::default();
        for ty in 0..plan.height() {
            let img_row = image.row(y + ty)?.get(x..x + tpl_width)?;
            let tpl_row = &weights[ty * tpl_width..(ty + 1) * tpl_width];
            for (&pixel, &weight) in img_row.iter().zip(tpl_row) {
                let value = pixel as f32;
                if want_sse {
                    let diff = value - weight;
                    sums.sse += diff * diff;
                } else {
                    sums.dot += weight * value;
                    sums.sum_i += value;
                    sums.sum_i2 += value * value;
                }
            }
        }
        Some(sums)
    }
}

impl Kernel for ScalarKernel {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f32 {
        if image.width() < plan.width() || image.height() < plan.height() {
            return f32::NEG_INFINITY;
        }
        if x > image.width() - plan.width() || y > image.height() - plan.height() {
            return f32::NEG_INFINITY;
        }
        match Self::window_sums(image, plan, x, y, params.method) {
            Some(sums) => sums.score(plan, params),
            None => f32::NEG_INFINITY,
        }
    }
}
