//! Splitting an image into horizontal bands of work.
//!
//! Bands partition the image rows exactly: contiguous, non-overlapping, in
//! order, and covering every row once. A band *owns* the template placements
//! whose top row lies inside it. Scoring those placements needs the
//! `tpl_height - 1` rows below the band as read-only context, so workers read
//! [`Band::context_rows`] but only emit [`Band::placement_rows`]. Concatenating
//! the per-band results in band order therefore rebuilds the whole-image
//! score map row for row.

use crate::trace::trace_event;
use crate::util::{BandMatchError, BandMatchResult};
use std::ops::Range;

/// Contiguous range of image rows assigned to one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    /// Position of the band in top-to-bottom order.
    pub index: usize,
    /// Image rows owned by this band.
    pub rows: Range<usize>,
}

impl Band {
    /// Returns the number of owned rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the band owns no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the placement rows (template top rows) this band scores.
    ///
    /// Rows below `img_height - tpl_height` have no valid placement, so bands
    /// near the bottom may own rows but no placements.
    pub fn placement_rows(&self, tpl_height: usize, img_height: usize) -> Range<usize> {
        let placements = (img_height + 1).saturating_sub(tpl_height);
        let start = self.rows.start.min(placements);
        let end = self.rows.end.min(placements);
        start..end
    }

    /// Returns the image rows a worker must read to score its placements.
    ///
    /// Empty when the band owns no placements.
    pub fn context_rows(&self, tpl_height: usize, img_height: usize) -> Range<usize> {
        let placements = self.placement_rows(tpl_height, img_height);
        if placements.is_empty() {
            return placements.start..placements.start;
        }
        placements.start..placements.end + tpl_height - 1
    }
}

/// Splits `height` rows into `count` ordered bands.
///
/// The first `height % count` bands receive one extra row. With more bands
/// than rows, the trailing bands are empty.
pub fn partition_rows(height: usize, count: usize) -> BandMatchResult<Vec<Band>> {
    if count == 0 {
        return Err(BandMatchError::InvalidWorkerCount);
    }
    let base = height / count;
    let extra = height % count;

    let mut bands = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let len = base + usize::from(index < extra);
        bands.push(Band {
            index,
            rows: start..start + len,
        });
        start += len;
    }
    debug_assert_eq!(start, height);

    trace_event!("bands_partitioned", rows = height, bands = count);
    Ok(bands)
}
