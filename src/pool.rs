//! Scoped worker pool with order-preserving gather.
//!
//! Every call builds a dedicated rayon pool of exactly `workers` threads with
//! `build_scoped`, so all threads are joined before [`run_ordered`] returns on
//! every exit path. Tasks are dispatched through an indexed parallel iterator
//! and gathered into a `Vec`, which keeps `results[i]` paired with `tasks[i]`
//! whatever order the workers finish in.

use crate::image::ImageView;
use crate::kernel::{correlate, placement_dims, ScanParams};
use crate::partition::Band;
use crate::score::ScoreMap;
use crate::template::TemplatePlan;
use crate::trace::{trace_span, trace_warn};
use crate::util::{BandMatchError, BandMatchResult};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Self-contained unit of work for one band.
///
/// Carries everything a worker needs by value; the image and template are
/// shared read-only.
#[derive(Clone, Debug)]
pub struct BandTask<'a> {
    /// Band whose placements this task scores.
    pub band: Band,
    /// The whole search image; the task reads only its context rows.
    pub image: ImageView<'a, u8>,
    /// Template statistics.
    pub template: &'a TemplatePlan,
    /// Correlation method and thresholds.
    pub params: ScanParams,
}

impl BandTask<'_> {
    /// Scores the placements owned by the band.
    pub fn scan(self) -> BandMatchResult<ScoreMap> {
        let _span =
            trace_span!("band_scan", band = self.band.index, rows = self.band.len()).entered();

        let (width, _) = placement_dims(self.image, self.template)?;
        let context = self
            .band
            .context_rows(self.template.height(), self.image.height());
        if context.is_empty() {
            return Ok(ScoreMap::empty(width));
        }
        let view = self.image.rows(context.start, context.end)?;
        correlate(view, self.template, self.params)
    }
}

/// Runs `work` over `tasks` on `workers` threads and returns results in task
/// order.
///
/// A task that returns an error or panics fails the whole call with
/// [`BandMatchError::WorkerFailed`]; when several fail, the earliest task in
/// order is reported. No partial results are returned.
pub fn run_ordered<T, R, F>(workers: usize, tasks: Vec<T>, work: F) -> BandMatchResult<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> BandMatchResult<R> + Sync,
{
    if workers == 0 {
        return Err(BandMatchError::InvalidWorkerCount);
    }
    let _span = trace_span!("worker_pool", workers = workers, tasks = tasks.len()).entered();

    let outcomes: Vec<BandMatchResult<R>> = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    tasks
                        .into_par_iter()
                        .enumerate()
                        .map(|(index, task)| run_guarded(index, task, &work))
                        .collect::<Vec<_>>()
                })
            },
        )
        .map_err(|err| BandMatchError::PoolBuild {
            reason: err.to_string(),
        })?;

    outcomes.into_iter().collect()
}

fn run_guarded<T, R, F>(index: usize, task: T, work: &F) -> BandMatchResult<R>
where
    F: Fn(T) -> BandMatchResult<R>,
{
    let outcome = match catch_unwind(AssertUnwindSafe(|| work(task))) {
        Ok(result) => result,
        Err(payload) => Err(BandMatchError::WorkerFailed {
            band: index,
            reason: format!("panicked: {}", panic_message(payload.as_ref())),
        }),
    };
    outcome.map_err(|err| {
        trace_warn!("worker_failed", band = index);
        match err {
            BandMatchError::WorkerFailed { .. } => err,
            other => BandMatchError::WorkerFailed {
                band: index,
                reason: other.to_string(),
            },
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::run_ordered;
    use crate::BandMatchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn results_follow_task_order_not_completion_order() {
        let tasks: Vec<u64> = (0..8).collect();
        let out = run_ordered(4, tasks, |i| {
            // Early tasks finish last.
            thread::sleep(Duration::from_millis((8 - i) * 3));
            Ok(i * 10)
        })
        .unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn pool_uses_the_requested_thread_count() {
        let out = run_ordered(3, vec![(); 6], |()| Ok(rayon::current_num_threads())).unwrap();
        assert!(out.iter().all(|&n| n == 3));
    }

    #[test]
    fn first_failing_task_is_reported() {
        let tasks: Vec<usize> = (0..6).collect();
        let err = run_ordered(2, tasks, |i| {
            if i == 2 || i == 4 {
                Err(BandMatchError::EmptyScoreMap)
            } else {
                Ok(i)
            }
        })
        .unwrap_err();
        assert_eq!(
            err,
            BandMatchError::WorkerFailed {
                band: 2,
                reason: "score map is empty".into(),
            }
        );
    }

    #[test]
    fn panics_become_worker_errors_and_every_task_still_runs() {
        let ran = AtomicUsize::new(0);
        let err = run_ordered(2, (0..4).collect::<Vec<usize>>(), |i| {
            ran.fetch_add(1, Ordering::SeqCst);
            if i == 1 {
                panic!("bad band");
            }
            Ok(i)
        })
        .unwrap_err();
        assert_eq!(
            err,
            BandMatchError::WorkerFailed {
                band: 1,
                reason: "panicked: bad band".into(),
            }
        );
        assert_eq!(ran.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = run_ordered(0, vec![1], Ok).unwrap_err();
        assert_eq!(err, BandMatchError::InvalidWorkerCount);
    }
}
