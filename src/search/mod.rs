//! Sequential and band-parallel template search.
//!
//! Both modes produce the same dense score map: the sequential path scans the
//! whole image once, the parallel path partitions the rows into one band per
//! worker, scans the bands on a scoped pool and stacks the partial maps back
//! together. The best placement is then located with the same first-maximum
//! rule, so the two modes agree on every input.

use crate::kernel::{correlate, placement_dims, Method, ScanParams};
use crate::locate::{locate_max, BoundingBox, MatchLocation};
use crate::partition::partition_rows;
use crate::pool::{run_ordered, BandTask};
use crate::score::{concat_rows, ScoreMap};
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{available_workers, BandMatchError, BandMatchResult};
use crate::ImageView;

/// Execution strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// One correlation pass over the whole image.
    Sequential,
    /// Row bands scanned on a worker pool.
    #[default]
    Parallel,
}

/// Search configuration.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Strategy used by [`Matcher::match_image`].
    pub mode: Mode,
    /// Correlation method.
    pub method: Method,
    /// Worker count for parallel mode; `None` uses every available core.
    pub workers: Option<usize>,
    /// Minimum window variance for normalized methods.
    pub min_var_i: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            method: Method::default(),
            workers: None,
            min_var_i: ScanParams::default().min_var_i,
        }
    }
}

impl MatchConfig {
    /// Number of workers parallel mode will use.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(available_workers)
    }

    fn scan_params(&self) -> ScanParams {
        ScanParams {
            method: self.method,
            min_var_i: self.min_var_i,
        }
    }
}

/// Best placement found by a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Top-left corner of the best placement.
    pub location: MatchLocation,
    /// Box covering the template at `location`.
    pub bbox: BoundingBox,
    /// Score at `location`.
    pub score: f32,
}

/// Template matcher holding precomputed template statistics.
pub struct Matcher {
    plan: TemplatePlan,
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    pub fn new(template: &Template) -> BandMatchResult<Self> {
        Ok(Self {
            plan: TemplatePlan::from_view(template.view())?,
            cfg: MatchConfig::default(),
        })
    }

    /// Replaces the matcher configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Runs the configured mode.
    pub fn match_image(&self, image: ImageView<'_, u8>) -> BandMatchResult<Match> {
        match self.cfg.mode {
            Mode::Sequential => self.match_sequential(image),
            Mode::Parallel => self.match_parallel(image),
        }
    }

    /// Finds the best placement with a single whole-image scan.
    pub fn match_sequential(&self, image: ImageView<'_, u8>) -> BandMatchResult<Match> {
        let scores = self.score_map_sequential(image)?;
        self.best_match(&scores)
    }

    /// Finds the best placement by scanning row bands in parallel.
    pub fn match_parallel(&self, image: ImageView<'_, u8>) -> BandMatchResult<Match> {
        let scores = self.score_map_parallel(image)?;
        self.best_match(&scores)
    }

    /// Scores every placement with a single whole-image scan.
    pub fn score_map_sequential(&self, image: ImageView<'_, u8>) -> BandMatchResult<ScoreMap> {
        self.validate(image)?;
        let _span = trace_span!(
            "match_sequential",
            width = image.width(),
            height = image.height()
        )
        .entered();
        correlate(image, &self.plan, self.cfg.scan_params())
    }

    /// Scores every placement band by band on a scoped worker pool.
    pub fn score_map_parallel(&self, image: ImageView<'_, u8>) -> BandMatchResult<ScoreMap> {
        if self.cfg.workers == Some(0) {
            return Err(BandMatchError::InvalidWorkerCount);
        }
        let (width, height) = self.validate(image)?;
        let workers = self.cfg.worker_count();
        let _span = trace_span!(
            "match_parallel",
            width = image.width(),
            height = image.height(),
            workers = workers
        )
        .entered();

        let params = self.cfg.scan_params();
        let tasks: Vec<BandTask<'_>> = partition_rows(image.height(), workers)?
            .into_iter()
            .map(|band| BandTask {
                band,
                image,
                template: &self.plan,
                params,
            })
            .collect();
        let parts = run_ordered(workers, tasks, BandTask::scan)?;
        let scores = concat_rows(width, parts)?;
        debug_assert_eq!(scores.height(), height);

        trace_event!("scores_reduced", rows = scores.height(), cols = scores.width());
        Ok(scores)
    }

    /// Checks the inputs before any correlation work and returns the
    /// placement grid size.
    fn validate(&self, image: ImageView<'_, u8>) -> BandMatchResult<(usize, usize)> {
        let dims = placement_dims(image, &self.plan)?;
        self.plan.check_method(self.cfg.method)?;
        Ok(dims)
    }

    fn best_match(&self, scores: &ScoreMap) -> BandMatchResult<Match> {
        let (location, score) = locate_max(scores)?;
        Ok(Match {
            location,
            bbox: BoundingBox::from_location(location, self.plan.width(), self.plan.height()),
            score,
        })
    }
}
