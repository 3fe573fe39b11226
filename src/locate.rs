//! Best-placement lookup and bounding boxes.

use crate::score::ScoreMap;
use crate::trace::trace_event;
use crate::util::{BandMatchError, BandMatchResult};

/// Top-left corner of a template placement, in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchLocation {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// Axis-aligned box covering one template placement.
///
/// `bottom_right` is exclusive: the box spans `top_left.x..bottom_right.x`
/// columns and `top_left.y..bottom_right.y` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub top_left: MatchLocation,
    pub bottom_right: MatchLocation,
}

impl BoundingBox {
    /// Builds the box of a `tpl_width x tpl_height` template placed at `loc`.
    pub fn from_location(loc: MatchLocation, tpl_width: usize, tpl_height: usize) -> Self {
        Self {
            top_left: loc,
            bottom_right: MatchLocation {
                x: loc.x + tpl_width,
                y: loc.y + tpl_height,
            },
        }
    }

    /// Box width in pixels.
    pub fn width(&self) -> usize {
        self.bottom_right.x - self.top_left.x
    }

    /// Box height in pixels.
    pub fn height(&self) -> usize {
        self.bottom_right.y - self.top_left.y
    }

    /// Returns true if the box lies inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.bottom_right.x <= width && self.bottom_right.y <= height
    }
}

/// Returns the location and score of the highest score in `scores`.
///
/// Scans in row-major order and only replaces the current best on a strictly
/// greater score, so among equal maxima the first one wins. NaN never wins.
/// If every score is NaN the first placement is reported.
pub fn locate_max(scores: &ScoreMap) -> BandMatchResult<(MatchLocation, f32)> {
    if scores.is_empty() {
        return Err(BandMatchError::EmptyScoreMap);
    }
    let width = scores.width();
    let data = scores.data();

    let mut best_idx = 0usize;
    let mut best = data[0];
    for (idx, &score) in data.iter().enumerate().skip(1) {
        if score > best || (best.is_nan() && !score.is_nan()) {
            best = score;
            best_idx = idx;
        }
    }

    let loc = MatchLocation {
        x: best_idx % width,
        y: best_idx / width,
    };
    trace_event!("match_located", x = loc.x, y = loc.y, score = best as f64);
    Ok((loc, best))
}
