//! BandMatch locates a grayscale template inside a larger image by exhaustive
//! correlation search.
//!
//! The search can run as one sequential scan or split into horizontal bands
//! scored on a scoped worker pool and stacked back into a single score map.
//! Bands read `template_height - 1` rows of context past their end, so both
//! modes produce bit-identical score maps and the same best match. With the
//! `image-io` feature the crate also loads rasters and outlines the match.

#[cfg(feature = "image-io")]
pub mod annotate;
pub mod image;
pub mod kernel;
pub mod locate;
pub mod partition;
pub mod pool;
pub mod score;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use annotate::{draw_bounding_box, BoxStyle};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage};
pub use kernel::{Kernel, Method, ScanParams};
pub use locate::{locate_max, BoundingBox, MatchLocation};
pub use partition::{partition_rows, Band};
pub use pool::{run_ordered, BandTask};
pub use score::{concat_rows, ScoreMap};
pub use search::{Match, MatchConfig, Matcher, Mode};
pub use template::{Template, TemplatePlan};
pub use util::{available_workers, BandMatchError, BandMatchResult, ErrorKind};
