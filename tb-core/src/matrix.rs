use crate::error::Error;

/// Escape counts for one box: a dense row-major matrix of shape
/// `(height, width)`, immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeMatrix {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl EscapeMatrix {
    /// Builds a matrix from row-major counts, validating the shape.
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Configuration(format!(
                "matrix dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(Error::Configuration(format!(
                "a {}x{} matrix needs {} counts, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(EscapeMatrix {
            width,
            height,
            data,
        })
    }

    // Internal constructor for buffers whose shape is correct by construction.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<u32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        EscapeMatrix {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Count at pixel `(col, row)`.
    pub fn at(&self, col: usize, row: usize) -> u32 {
        self.data[row * self.width + col]
    }

    /// One pixel row.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    /// All counts, row-major.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
}
