use num::complex::Complex64;

use crate::bbox::BoundingBox;
use crate::error::Error;
use crate::kernel::Kernel;
use crate::matrix::EscapeMatrix;

/// Evaluates `kernel` over every pixel of `bbox`.
///
/// Each count is the 0-based step index at which the orbit first diverged,
/// or `max_iter` if it never did within the budget; counts therefore lie in
/// `[0, max_iter]`. The evaluation is a pure function of its arguments with
/// no shared state, which is what makes a box safe to hand to an independent
/// worker.
pub fn compute<K>(bbox: &BoundingBox, max_iter: u32, kernel: &K) -> Result<EscapeMatrix, Error>
where
    K: Kernel + ?Sized,
{
    if max_iter == 0 {
        return Err(Error::Configuration(
            "iteration budget must be positive".to_string(),
        ));
    }
    let mut data = Vec::with_capacity(bbox.width() * bbox.height());
    for row in 0..bbox.height() {
        for col in 0..bbox.width() {
            data.push(escape(kernel, bbox.point_at(col, row), max_iter));
        }
    }
    Ok(EscapeMatrix::from_raw(bbox.width(), bbox.height(), data))
}

#[inline]
fn escape<K>(kernel: &K, c: Complex64, limit: u32) -> u32
where
    K: Kernel + ?Sized,
{
    let mut z = kernel.seed(c);
    for i in 0..limit {
        z = kernel.apply(z, c);
        if kernel.diverges(z) {
            return i;
        }
    }
    limit
}
