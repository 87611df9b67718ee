use num::complex::Complex64;

/// An escape-time recurrence.
///
/// A kernel is the per-pixel plug-in of the engine: [`seed`](Kernel::seed)
/// produces the starting orbit value for a domain point, [`apply`](Kernel::apply)
/// advances the recurrence one step, and [`diverges`](Kernel::diverges)
/// decides when an orbit has left the set. Kernels must be pure functions of
/// their arguments: workers call them concurrently from many threads with no
/// synchronization, and the same inputs must always produce the same outputs.
pub trait Kernel: Send + Sync {
    /// A short descriptive name, e.g. `mandelbrot`. Used in log fields.
    fn name(&self) -> &str;

    /// Starting orbit value for the domain point `c`.
    fn seed(&self, c: Complex64) -> Complex64;

    /// One step of the recurrence.
    fn apply(&self, z: Complex64, c: Complex64) -> Complex64;

    /// Whether the orbit has diverged.
    ///
    /// The default compares the squared magnitude against 4, i.e. distance
    /// from the origin against 2, skipping the square root.
    fn diverges(&self, z: Complex64) -> bool {
        z.norm_sqr() > 4.0
    }
}

/// The classic `z = z^2 + c` recurrence over a zero seed.
#[derive(Copy, Clone, Debug, Default)]
pub struct Mandelbrot;

impl Kernel for Mandelbrot {
    fn name(&self) -> &str {
        "mandelbrot"
    }

    fn seed(&self, _c: Complex64) -> Complex64 {
        Complex64::new(0.0, 0.0)
    }

    fn apply(&self, z: Complex64, c: Complex64) -> Complex64 {
        z * z + c
    }
}

/// `z = z^2 + k` for a fixed parameter `k`, seeded from the pixel's point.
#[derive(Copy, Clone, Debug)]
pub struct Julia {
    param: Complex64,
}

impl Julia {
    pub fn new(param: Complex64) -> Self {
        Julia { param }
    }

    pub fn param(&self) -> Complex64 {
        self.param
    }
}

impl Kernel for Julia {
    fn name(&self) -> &str {
        "julia"
    }

    fn seed(&self, c: Complex64) -> Complex64 {
        c
    }

    fn apply(&self, z: Complex64, _c: Complex64) -> Complex64 {
        z * z + self.param
    }
}
