use crate::error::Error;
use crate::grid::Grid;
use crate::matrix::EscapeMatrix;

/// Recombines a grid of tile results into one matrix by block concatenation:
/// each grid row is joined horizontally, then the rows are stacked
/// vertically.
///
/// Grids produced by `split` + `compute` are consistent by construction, but
/// hand-built grids are checked: every tile in a grid row must share its
/// height and every tile in a grid column must share its width, otherwise
/// the blocks cannot tile a rectangle.
pub fn assemble(grid: &Grid<EscapeMatrix>) -> Result<EscapeMatrix, Error> {
    let row_heights: Vec<usize> = (0..grid.rows()).map(|r| grid[(r, 0)].height()).collect();
    let col_widths: Vec<usize> = (0..grid.cols()).map(|c| grid[(0, c)].width()).collect();

    for ((row, col), tile) in grid.enumerate() {
        if tile.height() != row_heights[row] {
            return Err(Error::ShapeMismatch(format!(
                "tile ({}, {}) is {} pixels tall but its row is {}",
                row,
                col,
                tile.height(),
                row_heights[row]
            )));
        }
        if tile.width() != col_widths[col] {
            return Err(Error::ShapeMismatch(format!(
                "tile ({}, {}) is {} pixels wide but its column is {}",
                row,
                col,
                tile.width(),
                col_widths[col]
            )));
        }
    }

    let total_width: usize = col_widths.iter().sum();
    let total_height: usize = row_heights.iter().sum();

    let mut data = Vec::with_capacity(total_width * total_height);
    for row in 0..grid.rows() {
        for y in 0..row_heights[row] {
            for col in 0..grid.cols() {
                data.extend_from_slice(grid[(row, col)].row(y));
            }
        }
    }
    Ok(EscapeMatrix::from_raw(total_width, total_height, data))
}
