//! Corridor paths between room pairs and the interchangeable routers that produce them.

mod maze;
mod straight;

use serde::{Deserialize, Serialize};

use crate::types::Pos;

use super::grid::{CellRect, MapBounds};
use super::room::PlacedRoom;
use super::seed::GenRng;

pub use maze::MazeRouter;
pub use straight::StraightRouter;

const ON_LINE_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorStrategy {
    /// Straight runs where facing walls overlap, L-shaped runs otherwise.
    #[default]
    Straight,
    /// Goal-biased randomized depth-first walk over free cells.
    Maze,
}

impl CorridorStrategy {
    pub fn router(self) -> Box<dyn CorridorRouter> {
        match self {
            Self::Straight => Box::new(StraightRouter),
            Self::Maze => Box::new(MazeRouter),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    StraightHorizontal,
    StraightVertical,
    LShaped,
    Maze,
}

/// Ordered cells from the first room towards the second.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorridorPath {
    pub kind: RouteKind,
    pub cells: Vec<Pos>,
}

/// Everything a router may consult besides the two rooms it connects.
pub struct RouteContext<'a> {
    pub bounds: MapBounds,
    pub footprints: &'a [CellRect],
}

impl RouteContext<'_> {
    pub fn inside_room(&self, pos: Pos) -> bool {
        self.footprints.iter().any(|footprint| footprint.contains(pos))
    }
}

pub trait CorridorRouter {
    fn route(
        &self,
        context: &RouteContext<'_>,
        from: &PlacedRoom,
        to: &PlacedRoom,
        rng: &mut GenRng,
    ) -> CorridorPath;
}

/// Straight wall segment between two corner cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: Pos,
    pub end: Pos,
}

impl Segment {
    pub fn horizontal(left_x: i32, right_x: i32, y: i32) -> Self {
        Self { start: Pos { y, x: left_x }, end: Pos { y, x: right_x } }
    }

    pub fn vertical(x: i32, bottom_y: i32, top_y: i32) -> Self {
        Self { start: Pos { y: bottom_y, x }, end: Pos { y: top_y, x } }
    }

    /// Whether `(x, y)` lies on the segment strictly between its endpoints.
    pub fn contains_interior(&self, x: f64, y: f64) -> bool {
        let (ax, ay) = (f64::from(self.start.x), f64::from(self.start.y));
        let (bx, by) = (f64::from(self.end.x), f64::from(self.end.y));
        let to_start = (x - ax).hypot(y - ay);
        let to_end = (x - bx).hypot(y - by);
        if to_start < ON_LINE_EPSILON || to_end < ON_LINE_EPSILON {
            return false;
        }
        let length = (bx - ax).hypot(by - ay);
        (to_start + to_end - length).abs() < ON_LINE_EPSILON
    }
}

/// Appends the axis-aligned run from `from` to `to`, both inclusive, skipping a
/// duplicate of the last cell already in `cells`.
pub(super) fn push_run(cells: &mut Vec<Pos>, from: Pos, to: Pos) {
    debug_assert!(from.x == to.x || from.y == to.y);
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let mut current = from;
    loop {
        if cells.last() != Some(&current) {
            cells.push(current);
        }
        if current == to {
            break;
        }
        current = Pos { y: current.y + step_y, x: current.x + step_x };
    }
}
