//! Row-wise concatenation of partial score maps.

use crate::score::ScoreMap;
use crate::util::{BandMatchError, BandMatchResult};

/// Stacks partial score maps top to bottom in the order given.
///
/// Parts with no rows are skipped whatever their width; every other part must
/// be exactly `width` columns wide. Rows are neither reordered nor dropped,
/// so the output height is the sum of the part heights.
pub fn concat_rows<I>(width: usize, parts: I) -> BandMatchResult<ScoreMap>
where
    I: IntoIterator<Item = ScoreMap>,
{
    let mut data = Vec::new();
    let mut height = 0usize;
    for part in parts {
        if part.height() == 0 {
            continue;
        }
        if part.width() != width {
            return Err(BandMatchError::ScoreWidthMismatch {
                expected: width,
                got: part.width(),
            });
        }
        height += part.height();
        if data.is_empty() {
            data = part.into_data();
        } else {
            data.extend_from_slice(part.data());
        }
    }
    ScoreMap::new(data, width, height)
}
