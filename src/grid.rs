use crate::Coords;
use crate::config::{CELL_COLS, CELL_ROWS};
use crate::surface::Rect;

/// Playing field dimensions and the mapping from cells to surface rectangles.
///
/// The field is drawn inside a one-unit border starting at the surface origin,
/// so cell `(0, 0)` lands at `(1, 1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Grid { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn center(&self) -> Coords {
        (self.width / 2, self.height / 2)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    pub fn cell_rect(&self, (x, y): Coords) -> Rect {
        Rect::new(
            1 + x as u16 * CELL_COLS,
            1 + y as u16 * CELL_ROWS,
            CELL_COLS,
            CELL_ROWS,
        )
    }

    /// Rectangle covering the field plus its border.
    pub fn frame_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.width as u16 * CELL_COLS + 2,
            self.height as u16 * CELL_ROWS + 2,
        )
    }
}
