use num::complex::Complex64;

use crate::error::Error;
use crate::grid::Grid;

/// A rectangular window onto the domain plane.
///
/// A box maps an integer pixel raster of `width x height` onto a rectangle of
/// the complex plane, `extent` domain units across and centered on `center`.
/// Pixels are square: a single `scale` factor (domain units per pixel) is
/// taken as the larger of the two axis ratios, so a non-square raster covers
/// at least the requested extent on both axes rather than stretching it.
///
/// Columns map to the real axis and rows to the imaginary axis, both
/// increasing; the pixel at `(width / 2, height / 2)` sits exactly on
/// `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    width: usize,
    height: usize,
    center: Complex64,
    extent: Complex64,
    scale: f64,
    // Pixel-to-point mapping is anchored to the box this one was split from
    // (for a root box, itself): `frame` and `half` are the root's center and
    // half-raster, `origin` locates our pixel (0, 0) on the root raster.
    // Keeping the anchor means a pixel maps to bit-identical coordinates
    // whether it is evaluated through the parent or through a child tile.
    frame: Complex64,
    half: (i64, i64),
    origin: (i64, i64),
}

impl BoundingBox {
    /// Creates a root box. All four dimensions must be positive.
    pub fn new(
        width: usize,
        height: usize,
        center: Complex64,
        extent: Complex64,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Configuration(format!(
                "box dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !(extent.re > 0.0) || !(extent.im > 0.0) {
            return Err(Error::Configuration(format!(
                "box extent must be positive, got {}x{}",
                extent.re, extent.im
            )));
        }
        let scale = f64::max(extent.re / width as f64, extent.im / height as f64);
        Ok(BoundingBox {
            width,
            height,
            center,
            extent,
            scale,
            frame: center,
            half: ((width / 2) as i64, (height / 2) as i64),
            origin: (0, 0),
        })
    }

    /// Pixel columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pixel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Center of the box in domain coordinates.
    pub fn center(&self) -> Complex64 {
        self.center
    }

    /// Domain units covered along the real and imaginary axes.
    pub fn extent(&self) -> Complex64 {
        self.extent
    }

    /// Domain units per pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Domain-space point under pixel `(col, row)`.
    pub fn point_at(&self, col: usize, row: usize) -> Complex64 {
        let re = self.frame.re + (self.origin.0 + col as i64 - self.half.0) as f64 * self.scale;
        let im = self.frame.im + (self.origin.1 + row as i64 - self.half.1) as f64 * self.scale;
        Complex64::new(re, im)
    }

    /// Splits the box into an `n x n` grid of tiles at the same scale.
    ///
    /// Each tile is `width / n` by `height / n` pixels, truncating: when the
    /// parent size is not a multiple of `n`, the remainder pixels on the
    /// high-column/high-row edge are dropped from the tiling rather than
    /// redistributed. Tile (0, 0) covers the low-real, low-imaginary corner;
    /// tiles are laid out row-major. Tiles copy the parent `scale` instead of
    /// recomputing it, so rounding never compounds across the grid.
    pub fn split(&self, n: usize) -> Result<Grid<BoundingBox>, Error> {
        if n == 0 {
            return Err(Error::Configuration(
                "split factor must be positive".to_string(),
            ));
        }
        if self.width < n || self.height < n {
            return Err(Error::Configuration(format!(
                "cannot split a {}x{} box {n} ways: tiles would be empty",
                self.width, self.height
            )));
        }
        let (tile_w, tile_h) = (self.width / n, self.height / n);
        let mut tiles = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let origin = (
                    self.origin.0 + (col * tile_w) as i64,
                    self.origin.1 + (row * tile_h) as i64,
                );
                let mut tile = BoundingBox {
                    width: tile_w,
                    height: tile_h,
                    center: Complex64::new(0.0, 0.0),
                    extent: Complex64::new(tile_w as f64 * self.scale, tile_h as f64 * self.scale),
                    scale: self.scale,
                    frame: self.frame,
                    half: self.half,
                    origin,
                };
                tile.center = tile.point_at(tile_w / 2, tile_h / 2);
                tiles.push(tile);
            }
        }
        Grid::from_row_major(n, n, tiles)
    }
}
