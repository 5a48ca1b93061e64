//! Geometry primitives shared by the layout engine, the panel renderer
//! and the screen manager.
use serde::{Deserialize, Serialize};

/// An absolute coordinate, relative to the root window. Screens can sit
/// at negative offsets relative to each other in a multi-output layout,
/// so this is signed (the original's `i16` fields for `Screen`/`Client`
/// x/y).
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A window or screen position: top-left corner plus extent.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn corners(&self) -> (Point, Point, Point, Point) {
        let &Rect { x, y, w, h } = self;
        (
            Point::new(x, y),
            Point::new(x + w as i32, y),
            Point::new(x + w as i32, y + h as i32),
            Point::new(x, y + h as i32),
        )
    }

    pub fn midpoint(&self) -> Point {
        Point::new(self.x + (self.w / 2) as i32, self.y + (self.h / 2) as i32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn contains_point(&self, p: Point) -> bool {
        (self.x..=self.right()).contains(&p.x) && (self.y..=self.bottom()).contains(&p.y)
    }

    /// Center a `w`x`h` rectangle inside of this one.
    pub fn centered(&self, w: u32, h: u32) -> Rect {
        Rect {
            x: self.x + ((self.w.saturating_sub(w)) / 2) as i32,
            y: self.y + ((self.h.saturating_sub(h)) / 2) as i32,
            w,
            h,
        }
    }

    /// Split this rect vertically at `frac` (0.0-1.0) of its width.
    pub fn split_vertical(&self, frac: f32) -> (Rect, Rect) {
        let left_w = ((self.w as f32) * frac) as u32;
        (
            Rect::new(self.x, self.y, left_w, self.h),
            Rect::new(self.x + left_w as i32, self.y, self.w - left_w, self.h),
        )
    }

    /// Split this rect horizontally at `frac` (0.0-1.0) of its height.
    pub fn split_horizontal(&self, frac: f32) -> (Rect, Rect) {
        let top_h = ((self.h as f32) * frac) as u32;
        (
            Rect::new(self.x, self.y, self.w, top_h),
            Rect::new(self.x, self.y + top_h as i32, self.w, self.h - top_h),
        )
    }

    /// Split this rect into an evenly spaced grid of `cols` x `rows`
    /// cells, in row-major order. The final row absorbs any rounding
    /// remainder in its last cell.
    pub fn as_grid(&self, cols: u32, rows: u32) -> Vec<Rect> {
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let cell_w = self.w / cols;
        let cell_h = self.h / rows;
        let mut out = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let is_last_col = col == cols - 1;
                let is_last_row = row == rows - 1;
                let w = if is_last_col {
                    self.w - cell_w * col
                } else {
                    cell_w
                };
                let h = if is_last_row {
                    self.h - cell_h * row
                } else {
                    cell_h
                };
                out.push(Rect::new(
                    self.x + (cell_w * col) as i32,
                    self.y + (cell_h * row) as i32,
                    w,
                    h,
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_places_rect_in_middle() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = outer.centered(50, 50);
        assert_eq!(inner, Rect::new(25, 25, 50, 50));
    }

    #[test]
    fn grid_cells_tile_without_gaps_or_overlap() {
        let space = Rect::new(0, 0, 100, 100);
        let cells = space.as_grid(2, 2);
        assert_eq!(cells.len(), 4);
        let total: u64 = cells.iter().map(|r| r.w as u64 * r.h as u64).sum();
        assert_eq!(total, 100 * 100);
    }
}
