//! Mapping between the diagram's user space and terminal cells.
//!
//! Terminal cells are roughly twice as tall as they are wide, so the
//! diagram is fitted into the largest sub-rectangle that keeps its aspect
//! ratio under that assumption and centered in the available area.

use floorview_core::{Bounds, Point};
use ratatui::layout::Rect;

/// Height of a terminal cell relative to its width.
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Cells the diagram occupies.
    pub area: Rect,
    pub view: Bounds,
}

impl Viewport {
    /// Fit `view` into `available`. `None` when either is degenerate.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn fit(available: Rect, view: Bounds) -> Option<Self> {
        if available.width == 0 || available.height == 0 || view.width() <= 0.0 || view.height() <= 0.0
        {
            return None;
        }
        let view_aspect = view.width() / view.height();
        let cols = f64::from(available.width);
        let rows = f64::from(available.height);

        let (width, height) = if cols / (rows * CELL_ASPECT) > view_aspect {
            let width = (rows * CELL_ASPECT * view_aspect).round().max(1.0);
            (width as u16, available.height)
        } else {
            let height = (cols / view_aspect / CELL_ASPECT).round().max(1.0);
            (available.width, height as u16)
        };
        let width = width.min(available.width);
        let height = height.min(available.height);

        let area = Rect::new(
            available.x + (available.width - width) / 2,
            available.y + (available.height - height) / 2,
            width,
            height,
        );
        Some(Self { area, view })
    }

    pub fn contains_cell(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Center of cell `(column, row)` in diagram coordinates.
    pub fn cell_to_point(&self, column: u16, row: u16) -> Option<Point> {
        if !self.contains_cell(column, row) {
            return None;
        }
        let fx = (f64::from(column - self.area.x) + 0.5) / f64::from(self.area.width);
        let fy = (f64::from(row - self.area.y) + 0.5) / f64::from(self.area.height);
        Some(Point::new(
            self.view.min_x + fx * self.view.width(),
            self.view.min_y + fy * self.view.height(),
        ))
    }

    /// Canvas x bounds.
    pub fn x_bounds(&self) -> [f64; 2] {
        [self.view.min_x, self.view.max_x]
    }

    /// Canvas y bounds. The canvas y axis points up, so the diagram is
    /// drawn mirrored and every point goes through [`Viewport::to_canvas`].
    pub fn y_bounds(&self) -> [f64; 2] {
        [-self.view.max_y, -self.view.min_y]
    }

    pub fn to_canvas(point: Point) -> (f64, f64) {
        (point.x, -point.y)
    }

    /// Top-left cell, the origin of pointer coordinates for the tooltip.
    pub fn origin(&self) -> Point {
        Point::new(f64::from(self.area.x), f64::from(self.area.y))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn square() -> Bounds {
        Bounds::from_origin_size(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn square_view_in_wide_area_is_letterboxed() {
        let vp = Viewport::fit(Rect::new(0, 0, 80, 20), square()).unwrap();
        assert_eq!(vp.area, Rect::new(20, 0, 40, 20));
    }

    #[test]
    fn square_view_in_tall_area_is_pillarboxed() {
        let vp = Viewport::fit(Rect::new(0, 0, 20, 40), square()).unwrap();
        assert_eq!(vp.area, Rect::new(0, 15, 20, 10));
    }

    #[test]
    fn degenerate_inputs_do_not_fit() {
        assert!(Viewport::fit(Rect::new(0, 0, 0, 10), square()).is_none());
        let flat = Bounds::from_origin_size(0.0, 0.0, 10.0, 0.0);
        assert!(Viewport::fit(Rect::new(0, 0, 10, 10), flat).is_none());
    }

    #[test]
    fn cells_map_to_diagram_space() {
        let vp = Viewport {
            area: Rect::new(10, 5, 10, 10),
            view: square(),
        };
        assert_eq!(vp.cell_to_point(10, 5), Some(Point::new(5.0, 5.0)));
        assert_eq!(vp.cell_to_point(19, 14), Some(Point::new(95.0, 95.0)));
        assert_eq!(vp.cell_to_point(9, 5), None);
        assert_eq!(vp.cell_to_point(10, 15), None);
    }

    #[test]
    fn canvas_axis_is_mirrored() {
        let vp = Viewport {
            area: Rect::new(0, 0, 10, 10),
            view: Bounds::from_origin_size(0.0, 20.0, 50.0, 30.0),
        };
        assert_eq!(vp.y_bounds(), [-50.0, -20.0]);
        assert_eq!(Viewport::to_canvas(Point::new(3.0, 25.0)), (3.0, -25.0));
    }
}
