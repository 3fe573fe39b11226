//! SIMD-accelerated kernel using the `wide` crate.
//!
//! The inner template-row loop processes 8 pixels at a time using `f32x8`,
//! with a scalar tail for widths that are not a multiple of 8. Lane order only
//! depends on the template column, so a placement scores the same whether it
//! is scanned in a band or in the whole image.

use crate::kernel::{Kernel, Method, ScanParams, WindowSums};
use crate::template::TemplatePlan;
use crate::ImageView;
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

#[inline]
fn hsum(v: f32x8) -> f32 {
    v.to_array().iter().sum()
}

/// SIMD kernel covering every correlation method.
pub struct SimdKernel;

impl SimdKernel {
    fn window_sums(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        method: Method,
    ) -> Option<WindowSums> {
        let tpl_width = plan.width();
        let weights = plan.weights(method);
        let simd_end = tpl_width / LANES * LANES;

        let mut dot_vec = f32x8::ZERO;
        let mut sum_i_vec = f32x8::ZERO;
        let mut sum_i2_vec = f32x8::ZERO;
        let mut sse_vec = f32x8::ZERO;
        let mut tail = WindowSums::default();

        for ty in 0..plan.height() {
            let img_row = image.row(y + ty)?.get(x..x + tpl_width)?;
            let tpl_row = &weights[ty * tpl_width..(ty + 1) * tpl_width];

            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_u8x8_as_f32x8(&img_row[tx..]);
                let tpl_vals = load_f32x8(&tpl_row[tx..]);
                if method == Method::Sqdiff {
                    let diff = img_vals - tpl_vals;
                    sse_vec += diff * diff;
                } else {
                    dot_vec += tpl_vals * img_vals;
                    sum_i_vec += img_vals;
                    sum_i2_vec += img_vals * img_vals;
                }
                tx += LANES;
            }

            while tx < tpl_width {
                let value = img_row[tx] as f32;
                let weight = tpl_row[tx];
                if method == Method::Sqdiff {
                    let diff = value - weight;
                    tail.sse += diff * diff;
                } else {
                    tail.dot += weight * value;
                    tail.sum_i += value;
                    tail.sum_i2 += value * value;
                }
                tx += 1;
            }
        }

        Some(WindowSums {
            dot: hsum(dot_vec) + tail.dot,
            sum_i: hsum(sum_i_vec) + tail.sum_i,
            sum_i2: hsum(sum_i2_vec) + tail.sum_i2,
            sse: hsum(sse_vec) + tail.sse,
        })
    }
}

impl Kernel for SimdKernel {
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

#[cfg(test)]
mod tests {
    use super::SimdKernel;
    use crate::kernel::scalar::ScalarKernel;
    use crate::kernel::{Kernel, Method, ScanParams};
    use crate::template::TemplatePlan;
    use crate::ImageView;

    #[test]
    fn simd_agrees_with_scalar() {
        let (img_width, img_height) = (40, 24);
        let image: Vec<u8> = (0..img_width * img_height)
            .map(|i| ((i * 37) ^ (i / 7)) as u8)
            .collect();
        let (tpl_width, tpl_height) = (11, 5);
        let tpl: Vec<u8> = (0..tpl_width * tpl_height)
            .map(|i| ((i * 13) ^ 0x5A) as u8)
            .collect();
        let view = ImageView::from_slice(&image, img_width, img_height).unwrap();
        let plan =
            TemplatePlan::from_view(ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap())
                .unwrap();

        for method in [Method::Ccoeff, Method::CcoeffNormed, Method::Sqdiff] {
            let params = ScanParams {
                method,
                ..ScanParams::default()
            };
            let simd = <SimdKernel as Kernel>::scan_full(view, &plan, params).unwrap();
            let scalar = <ScalarKernel as Kernel>::scan_full(view, &plan, params).unwrap();
            let abs_tol = if method == Method::CcoeffNormed { 1e-3 } else { 16.0 };
            for (a, b) in simd.data().iter().zip(scalar.data()) {
                if b.is_infinite() {
                    assert_eq!(a, b);
                    continue;
                }
                let tol = abs_tol + 1e-4 * b.abs();
                assert!((a - b).abs() <= tol, "{method:?}: {a} vs {b}");
            }
        }
    }
}
