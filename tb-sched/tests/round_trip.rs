//! End-to-end contract tests: decomposed computation must be
//! indistinguishable from monolithic computation, whatever the pool does.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use num::complex::Complex64;
use tb_core::{assemble, compute, BoundingBox, Error, Grid, Kernel, Mandelbrot};
use tb_sched::{schedule, Progress, RunOptions, Scheduler};

#[test]
fn decomposed_equals_monolithic() {
    let bbox = BoundingBox::new(
        64,
        64,
        Complex64::new(0.0, 0.0),
        Complex64::new(4.0, 4.0),
    )
    .unwrap();
    let grid = bbox.split(4).unwrap();

    let tiled = assemble(&schedule(&grid, 50, Some(4)).unwrap()).unwrap();
    let direct = compute(&bbox, 50, &Mandelbrot).unwrap();

    // Element-for-element, not approximately: tiles see bit-identical
    // coordinates, so the matrices must be equal.
    assert_eq!(tiled, direct);
}

#[test]
fn center_of_the_set_survives_the_pipeline() {
    let bbox = BoundingBox::new(
        16,
        16,
        Complex64::new(-0.8, 0.0),
        Complex64::new(3.0, 3.0),
    )
    .unwrap();
    let out = assemble(&schedule(&bbox.split(4).unwrap(), 16, None).unwrap()).unwrap();
    assert_eq!(out.at(8, 8), 16);
}

#[test]
fn shuffled_submission_does_not_move_results() {
    let bbox = BoundingBox::new(
        32,
        32,
        Complex64::new(-0.6, 0.1),
        Complex64::new(3.0, 3.0),
    )
    .unwrap();
    let split = bbox.split(4).unwrap();

    // Rebuild the grid with its cells scrambled, so submission order has
    // nothing to do with spatial order.
    let mut cells: Vec<BoundingBox> = split.cells().to_vec();
    cells.reverse();
    cells.swap(1, 11);
    cells.swap(4, 14);
    let shuffled = Grid::from_row_major(4, 4, cells).unwrap();

    let results = schedule(&shuffled, 25, Some(4)).unwrap();
    for ((row, col), tile) in shuffled.enumerate() {
        let expected = compute(tile, 25, &Mandelbrot).unwrap();
        assert_eq!(results[(row, col)], expected, "tile ({}, {})", row, col);
    }
}

/// Mandelbrot, but each pixel also records how many seeds are live at once.
struct GaugedKernel {
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl GaugedKernel {
    fn new() -> Self {
        GaugedKernel {
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

impl Kernel for GaugedKernel {
    fn name(&self) -> &str {
        "gauged"
    }

    fn seed(&self, _c: Complex64) -> Complex64 {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(1));
        self.live.fetch_sub(1, Ordering::SeqCst);
        Complex64::new(0.0, 0.0)
    }

    fn apply(&self, z: Complex64, c: Complex64) -> Complex64 {
        z * z + c
    }
}

#[test]
fn concurrency_limit_is_respected() {
    let bbox = BoundingBox::new(
        12,
        12,
        Complex64::new(-0.5, 0.0),
        Complex64::new(3.0, 3.0),
    )
    .unwrap();
    let grid = bbox.split(3).unwrap();

    let kernel = Arc::new(GaugedKernel::new());
    let scheduler = Scheduler::with_concurrency(2).unwrap();
    scheduler.run(&grid, 5, Arc::clone(&kernel)).unwrap();

    let peak = kernel.peak.load(Ordering::SeqCst);
    assert!(peak >= 1);
    assert!(peak <= 2, "saw {} tiles live under a limit of 2", peak);
}

/// Never finishes a pixel quickly enough to matter.
struct StallingKernel;

impl Kernel for StallingKernel {
    fn name(&self) -> &str {
        "stalling"
    }

    fn seed(&self, _c: Complex64) -> Complex64 {
        thread::sleep(Duration::from_millis(5));
        Complex64::new(0.0, 0.0)
    }

    fn apply(&self, z: Complex64, c: Complex64) -> Complex64 {
        z * z + c
    }
}

#[test]
fn deadline_discards_the_whole_run() {
    let bbox = BoundingBox::new(
        8,
        8,
        Complex64::new(0.0, 0.0),
        Complex64::new(3.0, 3.0),
    )
    .unwrap();
    let grid = bbox.split(2).unwrap();

    let scheduler = Scheduler::with_concurrency(2).unwrap();
    let opts = RunOptions {
        timeout: Some(Duration::from_millis(10)),
        ..RunOptions::default()
    };
    match scheduler.run_with(&grid, 50, Arc::new(StallingKernel), &opts) {
        Err(Error::Timeout { total, .. }) => assert_eq!(total, 4),
        other => panic!("expected a timeout, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn progress_reaches_the_total_exactly_once_per_tile() {
    let bbox = BoundingBox::new(
        32,
        32,
        Complex64::new(-0.5, 0.0),
        Complex64::new(3.0, 3.0),
    )
    .unwrap();
    let grid = bbox.split(4).unwrap();
    let progress = Progress::new();
    let opts = RunOptions {
        progress: Some(progress.clone()),
        ..RunOptions::default()
    };
    let scheduler = Scheduler::with_concurrency(4).unwrap();
    scheduler
        .run_with(&grid, 20, Arc::new(Mandelbrot), &opts)
        .unwrap();
    assert_eq!(progress.completed(), grid.len());
}
