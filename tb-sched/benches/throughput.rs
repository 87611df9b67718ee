use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num::complex::Complex64;
use tb_core::{BoundingBox, Mandelbrot};
use tb_sched::Scheduler;

criterion_main!(benches);
criterion_group!(benches, bench_multithread);

/// Benchmark the tiled pipeline in the base window, across worker counts.
pub fn bench_multithread(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiled-mandelbrot");

    let bbox = BoundingBox::new(
        256,
        256,
        Complex64::new(-0.5, 0.0),
        Complex64::new(4.0, 4.0),
    )
    .unwrap();
    let grid = bbox.split(4).unwrap();

    // Count pixels:
    group.throughput(criterion::Throughput::Elements(
        bbox.width() as u64 * bbox.height() as u64,
    ));

    // Count up powers of two:
    let thread_range = (0..).map(|x| 1 << x).take_while({
        let x = num_cpus::get().next_power_of_two();
        move |y| (*y <= x)
    });
    for threads in thread_range {
        let scheduler = Scheduler::with_concurrency(threads).unwrap();

        group.bench_with_input(BenchmarkId::new("workers", threads), &grid, |b, grid| {
            b.iter(|| {
                scheduler
                    .run(black_box(grid), 64, Arc::new(Mandelbrot))
                    .unwrap()
            })
        });
    }

    group.finish();
}
