//! Tile scheduler for Tilebrot.
//!
//! Tiles are independent, side-effect-free units of work, so scheduling is a
//! fan-out/fan-in: one task per tile is dispatched onto a thread pool whose
//! size is the concurrency limit, and results come back over a channel tagged
//! with their grid position. Completion order is unspecified and never
//! affects where a result lands; the only ordering guarantee is structural.
//!
//! A run is all-or-nothing. The first tile failure dooms the run: tiles that
//! have not started yet are skipped, in-flight siblings are left to finish,
//! and the caller gets the failing tile's coordinates. A run that outlives
//! its deadline is discarded the same way. No partial grid is ever returned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tb_core::{compute, BoundingBox, Error, EscapeMatrix, Grid, Kernel, Mandelbrot};

/// A shared counter of completed tiles.
///
/// This is the single piece of shared mutable state the scheduler exposes,
/// intended for progress reporting; it is bumped with an atomic add once per
/// completed tile, never read-modify-written.
#[derive(Clone, Debug, Default)]
pub struct Progress(Arc<AtomicUsize>);

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles completed so far.
    pub fn completed(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Options for a scheduler run.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Overall deadline for the whole grid. On expiry the run fails with
    /// [`Error::Timeout`] and every completed or in-flight result is
    /// discarded.
    pub timeout: Option<Duration>,
    /// Counter bumped once per completed tile.
    pub progress: Option<Progress>,
}

/// Dispatches tile computations onto a bounded worker pool.
pub struct Scheduler {
    pool: rayon::ThreadPool,
    concurrency: usize,
}

impl Scheduler {
    /// A pool bounded by the host's reported core count.
    pub fn new() -> Result<Self, Error> {
        Self::with_concurrency(num_cpus::get())
    }

    /// A pool of exactly `limit` workers, so at most `limit` tiles are ever
    /// running at once; excess tiles queue.
    pub fn with_concurrency(limit: usize) -> Result<Self, Error> {
        if limit == 0 {
            return Err(Error::Configuration(
                "concurrency limit must be positive".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(limit)
            .thread_name(|i| format!("tilebrot-worker-{}", i))
            .build()
            .map_err(|err| {
                Error::Configuration(format!("could not build worker pool: {}", err))
            })?;
        Ok(Scheduler {
            pool,
            concurrency: limit,
        })
    }

    /// The configured concurrency limit.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Computes every tile of `grid` and returns the results in matching
    /// grid positions.
    pub fn run<K>(
        &self,
        grid: &Grid<BoundingBox>,
        max_iter: u32,
        kernel: Arc<K>,
    ) -> Result<Grid<EscapeMatrix>, Error>
    where
        K: Kernel + ?Sized + 'static,
    {
        self.run_with(grid, max_iter, kernel, &RunOptions::default())
    }

    /// [`run`](Scheduler::run) with a deadline and/or a progress counter.
    pub fn run_with<K>(
        &self,
        grid: &Grid<BoundingBox>,
        max_iter: u32,
        kernel: Arc<K>,
        opts: &RunOptions,
    ) -> Result<Grid<EscapeMatrix>, Error>
    where
        K: Kernel + ?Sized + 'static,
    {
        if max_iter == 0 {
            return Err(Error::Configuration(
                "iteration budget must be positive".to_string(),
            ));
        }
        let total = grid.len();
        let start = Instant::now();
        let deadline = opts.timeout.map(|t| start + t);

        let span = tracing::info_span!(
            "schedule",
            kernel = kernel.name(),
            tiles = total,
            concurrency = self.concurrency
        );
        let _guard = span.enter();

        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        for ((row, col), tile) in grid.enumerate() {
            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);
            let kernel = Arc::clone(&kernel);
            let tile = *tile;
            // spawn_fifo keeps execution close to grid order; correctness of
            // placement never depends on it.
            self.pool.spawn_fifo(move || {
                // A failed sibling has already doomed the run; skip tiles
                // that have not started yet.
                if cancelled.load(Ordering::Relaxed) {
                    return;
                }
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| compute(&tile, max_iter, &*kernel)));
                let outcome = match outcome {
                    Ok(result) => result.map_err(|err| err.to_string()),
                    Err(payload) => Err(panic_message(payload)),
                };
                if outcome.is_err() {
                    cancelled.store(true, Ordering::Relaxed);
                }
                // The collector may have bailed already; nothing to do then.
                let _ = tx.send(((row, col), outcome));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<EscapeMatrix>> = (0..total).map(|_| None).collect();
        let mut filled = 0usize;
        while filled < total {
            let message = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(left) {
                        Ok(message) => message,
                        Err(RecvTimeoutError::Timeout) => {
                            cancelled.store(true, Ordering::Relaxed);
                            return Err(Error::Timeout {
                                elapsed: start.elapsed(),
                                completed: filled,
                                total,
                            });
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            return Err(Error::Internal(
                                "worker pool hung up before the grid completed".to_string(),
                            ));
                        }
                    }
                }
                None => match rx.recv() {
                    Ok(message) => message,
                    Err(_) => {
                        return Err(Error::Internal(
                            "worker pool hung up before the grid completed".to_string(),
                        ));
                    }
                },
            };
            let ((row, col), outcome) = message;
            match outcome {
                Ok(matrix) => {
                    let slot = &mut slots[row * grid.cols() + col];
                    debug_assert!(slot.is_none(), "tile ({}, {}) reported twice", row, col);
                    *slot = Some(matrix);
                    filled += 1;
                    if let Some(progress) = &opts.progress {
                        progress.bump();
                    }
                    tracing::trace!(row, col, filled, total, "tile complete");
                }
                Err(reason) => {
                    return Err(Error::Compute { row, col, reason });
                }
            }
        }
        tracing::debug!(elapsed = ?start.elapsed(), tiles = total, "grid complete");

        let cells: Vec<EscapeMatrix> = slots.into_iter().flatten().collect();
        Grid::from_row_major(grid.rows(), grid.cols(), cells)
    }
}

/// One-call entry point: computes every tile with the default Mandelbrot
/// recurrence, bounded by `limit` concurrent workers (the host's core count
/// when `None`).
pub fn schedule(
    grid: &Grid<BoundingBox>,
    max_iter: u32,
    limit: Option<usize>,
) -> Result<Grid<EscapeMatrix>, Error> {
    let scheduler = match limit {
        Some(limit) => Scheduler::with_concurrency(limit)?,
        None => Scheduler::new()?,
    };
    scheduler.run(grid, max_iter, Arc::new(Mandelbrot))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "kernel panicked".to_string()
    }
}
