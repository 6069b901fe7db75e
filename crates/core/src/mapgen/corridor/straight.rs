//! Straight and L-shaped routing between room centres.

use crate::types::Pos;

use super::super::grid::CellRect;
use super::super::room::PlacedRoom;
use super::super::seed::GenRng;
use super::{CorridorPath, CorridorRouter, RouteContext, RouteKind, Segment, push_run};

/// Deterministic router: never draws from the random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightRouter;

impl CorridorRouter for StraightRouter {
    fn route(
        &self,
        _context: &RouteContext<'_>,
        from: &PlacedRoom,
        to: &PlacedRoom,
        _rng: &mut GenRng,
    ) -> CorridorPath {
        route_between(from.footprint, to.footprint)
    }
}

pub(in crate::mapgen) fn route_between(from: CellRect, to: CellRect) -> CorridorPath {
    let start = from.center();
    let end = to.center();
    let mut cells = Vec::new();

    if let Some(x) = shared_column(from, to) {
        push_run(&mut cells, Pos { y: start.y, x }, Pos { y: end.y, x });
        return CorridorPath { kind: RouteKind::StraightVertical, cells };
    }
    if let Some(y) = shared_row(from, to) {
        push_run(&mut cells, Pos { y, x: start.x }, Pos { y, x: end.x });
        return CorridorPath { kind: RouteKind::StraightHorizontal, cells };
    }

    let corner = Pos { y: start.y, x: end.x };
    push_run(&mut cells, start, corner);
    push_run(&mut cells, corner, end);
    CorridorPath { kind: RouteKind::LShaped, cells }
}

/// Column through both facing horizontal walls, away from their corners.
fn shared_column(from: CellRect, to: CellRect) -> Option<i32> {
    let (from_wall_y, to_wall_y) =
        if to.center().y >= from.center().y { (from.top(), to.y) } else { (from.y, to.top()) };
    let from_edge = Segment::horizontal(from.x, from.right(), from_wall_y);
    let to_edge = Segment::horizontal(to.x, to.right(), to_wall_y);
    let on_both = |x: i32| {
        from_edge.contains_interior(f64::from(x), f64::from(from_wall_y))
            && to_edge.contains_interior(f64::from(x), f64::from(to_wall_y))
    };

    let midpoint = (from.center().x + to.center().x).div_euclid(2);
    pick_on_both(midpoint, from.x.max(to.x) + 1, from.right().min(to.right()) - 1, on_both)
}

/// Row through both facing vertical walls, away from their corners.
fn shared_row(from: CellRect, to: CellRect) -> Option<i32> {
    let (from_wall_x, to_wall_x) =
        if to.center().x >= from.center().x { (from.right(), to.x) } else { (from.x, to.right()) };
    let from_edge = Segment::vertical(from_wall_x, from.y, from.top());
    let to_edge = Segment::vertical(to_wall_x, to.y, to.top());
    let on_both = |y: i32| {
        from_edge.contains_interior(f64::from(from_wall_x), f64::from(y))
            && to_edge.contains_interior(f64::from(to_wall_x), f64::from(y))
    };

    let midpoint = (from.center().y + to.center().y).div_euclid(2);
    pick_on_both(midpoint, from.y.max(to.y) + 1, from.top().min(to.top()) - 1, on_both)
}

/// The midpoint when it qualifies, otherwise the midpoint pulled into `[low, high]`.
fn pick_on_both(midpoint: i32, low: i32, high: i32, on_both: impl Fn(i32) -> bool) -> Option<i32> {
    if on_both(midpoint) {
        return Some(midpoint);
    }
    if low > high {
        return None;
    }
    let offset = midpoint.clamp(low, high);
    on_both(offset).then_some(offset)
}
