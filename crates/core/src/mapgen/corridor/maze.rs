//! Maze-style routing: a randomized depth-first walk with backtracking over free cells.

use std::collections::BTreeSet;

use crate::types::Pos;

use super::super::room::PlacedRoom;
use super::super::seed::GenRng;
use super::straight::route_between;
use super::{CorridorPath, CorridorRouter, RouteContext, RouteKind};

/// Walks from the first room's wall towards the second, preferring the step that closes
/// the distance half of the time. Falls back to straight/L routing when the walk cannot
/// leave the first room or exhausts the free region.
#[derive(Clone, Copy, Debug, Default)]
pub struct MazeRouter;

impl CorridorRouter for MazeRouter {
    fn route(
        &self,
        context: &RouteContext<'_>,
        from: &PlacedRoom,
        to: &PlacedRoom,
        rng: &mut GenRng,
    ) -> CorridorPath {
        match walk(context, from, to, rng) {
            Some(cells) => CorridorPath { kind: RouteKind::Maze, cells },
            None => {
                log::debug!(
                    "maze walk from '{}' to '{}' found no free route, using straight routing",
                    from.name,
                    to.name
                );
                route_between(from.footprint, to.footprint)
            }
        }
    }
}

fn walk(
    context: &RouteContext<'_>,
    from: &PlacedRoom,
    to: &PlacedRoom,
    rng: &mut GenRng,
) -> Option<Vec<Pos>> {
    let goal = to.center();
    let start = from
        .footprint
        .expanded(1)
        .cells()
        .filter(|&pos| from.footprint.touches(pos) && is_free(context, pos))
        .min_by_key(|&pos| (squared_distance(pos, goal), pos))?;

    let mut stack = vec![start];
    let mut visited = BTreeSet::from([start]);
    while let Some(&current) = stack.last() {
        if to.footprint.touches(current) {
            return Some(stack);
        }

        let mut options: Vec<Pos> = current
            .neighbors()
            .into_iter()
            .filter(|&next| !visited.contains(&next) && is_free(context, next))
            .collect();
        if options.is_empty() {
            stack.pop();
            continue;
        }

        rng.shuffle(&mut options);
        if rng.below(2) == 0
            && let Some(closest) = options
                .iter()
                .enumerate()
                .min_by_key(|&(_, &pos)| squared_distance(pos, goal))
                .map(|(index, _)| index)
        {
            options.swap(0, closest);
        }

        let next = options[0];
        visited.insert(next);
        stack.push(next);
    }
    None
}

/// Inside the map, off the outermost ring, and outside every room.
fn is_free(context: &RouteContext<'_>, pos: Pos) -> bool {
    let bounds = context.bounds;
    pos.x > bounds.min_x()
        && pos.x < bounds.max_x() - 1
        && pos.y > bounds.min_y()
        && pos.y < bounds.max_y() - 1
        && !context.inside_room(pos)
}

fn squared_distance(a: Pos, b: Pos) -> i64 {
    let dx = i64::from(a.x - b.x);
    let dy = i64::from(a.y - b.y);
    dx * dx + dy * dy
}
