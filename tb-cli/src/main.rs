use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use num::complex::Complex64;
use tb_core::{assemble, image::Renderer, BoundingBox, Julia, Kernel, Mandelbrot};
use tb_sched::{RunOptions, Scheduler};

#[derive(Debug, Parser)]
#[command(name = "tilebrot", about = "Tiled escape-time fractal renderer")]
struct Args {
    /// Image width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Image height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: usize,

    /// Real part of the window center.
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    center_x: f64,

    /// Imaginary part of the window center.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_y: f64,

    /// Domain units covered along the real axis.
    #[arg(long, default_value_t = 3.0)]
    extent_x: f64,

    /// Domain units covered along the imaginary axis.
    #[arg(long, default_value_t = 3.0)]
    extent_y: f64,

    /// Iteration budget per pixel.
    #[arg(long, default_value_t = 256)]
    iters: u32,

    /// Split factor: the window is computed as an n x n grid of tiles.
    #[arg(long, default_value_t = 8)]
    tiles: usize,

    /// Cap on concurrently running tiles; defaults to the core count.
    #[arg(long)]
    threads: Option<usize>,

    /// Give up if the whole render takes longer than this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Render the Julia set for this parameter ("re,im") instead of the
    /// Mandelbrot set.
    #[arg(long, allow_hyphen_values = true)]
    julia: Option<String>,

    /// Output PNG path.
    out: PathBuf,
}

fn parse_complex(s: &str) -> anyhow::Result<Complex64> {
    let (re, im) = s
        .split_once(',')
        .with_context(|| format!("expected \"re,im\", got {:?}", s))?;
    Ok(Complex64::new(
        re.trim().parse().context("bad real part")?,
        im.trim().parse().context("bad imaginary part")?,
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let bbox = BoundingBox::new(
        args.width,
        args.height,
        Complex64::new(args.center_x, args.center_y),
        Complex64::new(args.extent_x, args.extent_y),
    )?;
    let grid = bbox.split(args.tiles)?;

    let kernel: Arc<dyn Kernel> = match &args.julia {
        Some(param) => Arc::new(Julia::new(parse_complex(param)?)),
        None => Arc::new(Mandelbrot),
    };

    let scheduler = match args.threads {
        Some(threads) => Scheduler::with_concurrency(threads)?,
        None => Scheduler::new()?,
    };
    let opts = RunOptions {
        timeout: args.timeout_ms.map(Duration::from_millis),
        ..RunOptions::default()
    };

    let start = Instant::now();
    let results = scheduler.run_with(&grid, args.iters, kernel, &opts)?;
    let matrix = assemble(&results)?;
    tracing::info!(
        elapsed = ?start.elapsed(),
        width = matrix.width(),
        height = matrix.height(),
        "computed"
    );

    let image = Renderer::default().render(&matrix, args.iters)?;
    let mut buffer = Cursor::new(Vec::<u8>::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .context("encoding PNG")?;
    std::fs::write(&args.out, buffer.into_inner())
        .with_context(|| format!("writing {}", args.out.display()))?;

    Ok(())
}
