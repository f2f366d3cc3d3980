//! Grid layout: a fixed table of cells with row and column spans.

use crate::element::{ElementBase, ElementRef, Widget};
use crate::error::{Result, UiError};
use crate::input::Frame;
use crate::layout::Align;
use crate::primitives::{Point, Size};

/// An occupied cell.
#[derive(Debug, Clone)]
pub struct GridItem {
    pub element: ElementRef,
    pub rowspan: usize,
    pub colspan: usize,
    pub halign: Align,
    pub valign: Align,
}

/// Rows and columns are fixed at construction.
#[derive(Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<GridItem>>,
    /// Gap after each row but the last.
    row_spacing: Vec<i32>,
    /// Gap after each column but the last.
    col_spacing: Vec<i32>,
}

/// Measured column widths and row heights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tracks {
    pub(crate) col_widths: Vec<i32>,
    pub(crate) row_heights: Vec<i32>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            row_spacing: vec![0; rows.saturating_sub(1)],
            col_spacing: vec![0; cols.saturating_sub(1)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(UiError::GridOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Place `element` at (`row`, `col`), replacing any previous occupant.
    #[allow(clippy::too_many_arguments)]
    pub fn attach(
        &mut self,
        element: &ElementRef,
        row: usize,
        col: usize,
        rowspan: usize,
        colspan: usize,
        halign: Align,
        valign: Align,
    ) -> Result<()> {
        let index = self.index(row, col)?;
        if rowspan == 0 || colspan == 0 || row + rowspan > self.rows || col + colspan > self.cols {
            return Err(UiError::InvalidSpan {
                row,
                col,
                rowspan,
                colspan,
            });
        }
        self.cells[index] = Some(GridItem {
            element: element.clone(),
            rowspan,
            colspan,
            halign,
            valign,
        });
        Ok(())
    }

    /// Empty a cell, returning its element.
    pub fn detach(&mut self, row: usize, col: usize) -> Result<Option<ElementRef>> {
        let index = self.index(row, col)?;
        Ok(self.cells[index].take().map(|item| item.element))
    }

    pub fn item(&self, row: usize, col: usize) -> Option<&GridItem> {
        self.index(row, col)
            .ok()
            .and_then(|index| self.cells[index].as_ref())
    }

    /// Gap between `row` and the next one.
    pub fn set_row_spacing(&mut self, row: usize, spacing: i32) -> Result<()> {
        match self.row_spacing.get_mut(row) {
            Some(gap) => {
                *gap = spacing;
                Ok(())
            }
            None => Err(UiError::GridOutOfBounds {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    /// Gap between `col` and the next one.
    pub fn set_col_spacing(&mut self, col: usize, spacing: i32) -> Result<()> {
        match self.col_spacing.get_mut(col) {
            Some(gap) => {
                *gap = spacing;
                Ok(())
            }
            None => Err(UiError::GridOutOfBounds {
                row: 0,
                col,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    pub fn set_row_spacing_all(&mut self, spacing: i32) {
        self.row_spacing.fill(spacing);
    }

    pub fn set_col_spacing_all(&mut self, spacing: i32) {
        self.col_spacing.fill(spacing);
    }

    fn occupied(&self) -> impl Iterator<Item = (usize, usize, &GridItem)> {
        self.cells.iter().enumerate().filter_map(|(index, cell)| {
            cell.as_ref()
                .map(|item| (index / self.cols, index % self.cols, item))
        })
    }

    /// Column widths and row heights from single-span occupants.
    pub(crate) fn measure_tracks(&self) -> Tracks {
        let mut col_widths = vec![0; self.cols];
        let mut row_heights = vec![0; self.rows];
        for (row, col, item) in self.occupied() {
            let size = item.element.layout_size();
            if item.colspan == 1 {
                col_widths[col] = col_widths[col].max(size.width);
            }
            if item.rowspan == 1 {
                row_heights[row] = row_heights[row].max(size.height);
            }
        }
        Tracks {
            col_widths,
            row_heights,
        }
    }

    pub fn measure(&self) -> Size {
        let tracks = self.measure_tracks();
        Size::new(
            span_extent(&tracks.col_widths, &self.col_spacing, 0, self.cols),
            span_extent(&tracks.row_heights, &self.row_spacing, 0, self.rows),
        )
    }
}

/// Extent of `count` tracks from `start`, including the gaps between them.
pub(crate) fn span_extent(tracks: &[i32], spacing: &[i32], start: usize, count: usize) -> i32 {
    let end = (start + count).min(tracks.len());
    let mut total: i32 = tracks[start.min(end)..end].iter().sum();
    if end > start + 1 {
        total += spacing[start..end - 1].iter().sum::<i32>();
    }
    total
}

/// Offset and size of a child within a span.
fn place(align: Align, span: i32, child: i32) -> (i32, i32) {
    match align {
        Align::Start => (0, child),
        Align::Middle => ((span - child) / 2, child),
        Align::End => (span - child, child),
        Align::Fill => (0, span),
    }
}

/// Start coordinate of every track.
fn track_starts(tracks: &[i32], spacing: &[i32]) -> Vec<i32> {
    let mut at = 0;
    tracks
        .iter()
        .enumerate()
        .map(|(index, extent)| {
            let start = at;
            at += extent + spacing.get(index).copied().unwrap_or(0);
            start
        })
        .collect()
}

impl Widget for Grid {
    fn draw(&mut self, _base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let tracks = self.measure_tracks();
        let xs = track_starts(&tracks.col_widths, &self.col_spacing);
        let ys = track_starts(&tracks.row_heights, &self.row_spacing);

        for (row, col, item) in self.occupied() {
            let preferred = item.element.layout_size();
            let span_w = span_extent(&tracks.col_widths, &self.col_spacing, col, item.colspan);
            let span_h = span_extent(&tracks.row_heights, &self.row_spacing, row, item.rowspan);
            let (dx, width) = place(item.halign, span_w, preferred.width);
            let (dy, height) = place(item.valign, span_h, preferred.height);

            let current = item.element.size();
            item.element.set_size(Size::new(
                if width > 0 { width } else { current.width },
                if height > 0 { height } else { current.height },
            ));
            item.element.set_pos(Point::new(xs[col] + dx, ys[row] + dy));
            item.element.draw(frame, origin);
        }
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.measure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_extent_includes_inner_spacing() {
        let widths = [10, 20, 30];
        let gaps = [3, 5];
        assert_eq!(span_extent(&widths, &gaps, 0, 1), 10);
        assert_eq!(span_extent(&widths, &gaps, 0, 2), 33);
        assert_eq!(span_extent(&widths, &gaps, 1, 2), 55);
        assert_eq!(span_extent(&widths, &gaps, 0, 3), 68);
    }

    #[test]
    fn place_against_whole_span() {
        assert_eq!(place(Align::Start, 40, 10), (0, 10));
        assert_eq!(place(Align::Middle, 40, 10), (15, 10));
        assert_eq!(place(Align::End, 40, 10), (30, 10));
        assert_eq!(place(Align::Fill, 40, 10), (0, 40));
    }

    #[test]
    fn track_starts_accumulate_spacing() {
        assert_eq!(track_starts(&[10, 20, 30], &[3, 5]), vec![0, 13, 38]);
    }

    #[test]
    fn attach_rejects_out_of_bounds_and_bad_spans() {
        let mut grid = Grid::new(2, 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert!(matches!(
            grid.set_row_spacing(1, 4),
            Err(UiError::GridOutOfBounds { row: 1, .. })
        ));
        assert!(grid.set_col_spacing(1, 4).is_ok());
        assert!(matches!(grid.detach(2, 0), Err(UiError::GridOutOfBounds { .. })));
        assert!(matches!(grid.detach(0, 0), Ok(None)));
    }
}
