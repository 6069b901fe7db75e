//! Map bounds and cell-space rectangles shared by placement, routing, and door carving.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::types::Pos;

/// Map extent centred on the origin: `x` in `[min_x, min_x + width)`, same for `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    width: i32,
    height: i32,
}

impl MapBounds {
    pub fn new(width: i32, height: i32) -> Result<Self, GenerationError> {
        if width <= 0 || height <= 0 {
            return Err(GenerationError::InvalidMapSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> i32 {
        self.width
    }

    pub fn height(self) -> i32 {
        self.height
    }

    pub fn min_x(self) -> i32 {
        -(self.width / 2)
    }

    pub fn min_y(self) -> i32 {
        -(self.height / 2)
    }

    /// Exclusive upper x bound.
    pub fn max_x(self) -> i32 {
        self.min_x() + self.width
    }

    /// Exclusive upper y bound.
    pub fn max_y(self) -> i32 {
        self.min_y() + self.height
    }

    pub fn as_rect(self) -> CellRect {
        CellRect { x: self.min_x(), y: self.min_y(), width: self.width, height: self.height }
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.min_x()
            && pos.x < self.max_x()
            && pos.y >= self.min_y()
            && pos.y < self.max_y()
    }

    /// Cells in row-major order, bottom row first.
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        self.as_rect().cells()
    }

    pub fn cell_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Inclusive rectangle of cells anchored at its lowest `(x, y)` corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    /// Rectangle of `width x height` cells whose centre cell is `center`.
    pub fn centered_at(center: Pos, width: i32, height: i32) -> Self {
        Self { x: center.x - width / 2, y: center.y - height / 2, width, height }
    }

    pub fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub fn top(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }

    pub fn expanded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2,
            height: self.height + margin * 2,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.top()
            && self.top() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.top()
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        let (x0, x1) = (self.x, self.right());
        (self.y..=self.top()).flat_map(move |y| (x0..=x1).map(move |x| Pos { y, x }))
    }

    /// Whether `pos` shares an edge with a cell of this rectangle without being inside it.
    pub fn touches(self, pos: Pos) -> bool {
        !self.contains(pos) && pos.neighbors().into_iter().any(|next| self.contains(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_bounds_are_half_open_around_origin() {
        let bounds = MapBounds::new(20, 20).expect("valid size");
        assert_eq!((bounds.min_x(), bounds.max_x()), (-10, 10));
        assert!(bounds.contains(Pos::new(-10, 9)));
        assert!(!bounds.contains(Pos::new(10, 0)));
    }

    #[test]
    fn odd_bounds_cover_exactly_width_cells() {
        let bounds = MapBounds::new(5, 3).expect("valid size");
        assert_eq!((bounds.min_x(), bounds.max_x()), (-2, 3));
        assert_eq!((bounds.min_y(), bounds.max_y()), (-1, 2));
        assert_eq!(bounds.cells().count(), 15);
        assert!(bounds.cells().all(|pos| bounds.contains(pos)));
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert_eq!(
            MapBounds::new(0, 10),
            Err(GenerationError::InvalidMapSize { width: 0, height: 10 })
        );
        assert!(MapBounds::new(10, -3).is_err());
    }

    #[test]
    fn expanded_rectangles_detect_near_misses() {
        let left = CellRect { x: 0, y: 0, width: 4, height: 4 };
        let gapped = CellRect { x: 5, y: 0, width: 4, height: 4 };
        assert!(!left.intersects(&gapped));
        assert!(!left.expanded(1).intersects(&gapped));
        assert!(left.expanded(2).intersects(&gapped));

        let flush = CellRect { x: 4, y: 0, width: 4, height: 4 };
        assert!(!left.intersects(&flush));
        assert!(left.expanded(1).intersects(&flush));
    }

    #[test]
    fn centered_rect_keeps_center_cell() {
        for (width, height) in [(4, 4), (5, 3), (1, 1), (6, 7)] {
            let center = Pos::new(2, -3);
            let rect = CellRect::centered_at(center, width, height);
            assert_eq!(rect.center(), center);
            assert_eq!(rect.cells().count(), (width * height) as usize);
        }
    }

    #[test]
    fn touching_cells_sit_just_outside_the_rect() {
        let rect = CellRect { x: 0, y: 0, width: 3, height: 3 };
        assert!(rect.touches(Pos::new(-1, 1)));
        assert!(rect.touches(Pos::new(1, 3)));
        assert!(!rect.touches(Pos::new(-1, -1)));
        assert!(!rect.touches(Pos::new(1, 1)));
    }
}
