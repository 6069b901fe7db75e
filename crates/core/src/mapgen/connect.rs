//! Greedy nearest-neighbour spanning walk over placed rooms, carving one corridor per edge.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::types::TileId;

use super::corridor::{CorridorPath, CorridorRouter, RouteContext, RouteKind};
use super::grid::{CellRect, MapBounds};
use super::layer::Layer;
use super::room::{PlacedRoom, RoomId};
use super::seed::GenRng;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorEdge {
    pub from: RoomId,
    pub to: RoomId,
    pub kind: RouteKind,
    /// Cells actually carved, i.e. the path minus cells under rooms.
    pub carved: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorReport {
    pub edges: Vec<CorridorEdge>,
    /// Rooms the walk could not reach. Empty unless connectivity is incomplete.
    pub unreached: Vec<RoomId>,
}

impl CorridorReport {
    pub fn is_complete(&self) -> bool {
        self.unreached.is_empty()
    }
}

pub(super) struct ConnectRequest<'a> {
    pub(super) bounds: MapBounds,
    pub(super) rooms: &'a SlotMap<RoomId, PlacedRoom>,
    pub(super) router: &'a dyn CorridorRouter,
    pub(super) corridor_tile: TileId,
}

pub(super) fn connect_rooms(
    request: &ConnectRequest<'_>,
    rng: &mut GenRng,
) -> (Layer, CorridorReport) {
    let rooms = request.rooms;
    let mut layer = Layer::new();
    let mut report = CorridorReport::default();

    let mut pending: Vec<RoomId> = rooms.keys().collect();
    if pending.len() < 2 {
        return (layer, report);
    }

    let footprints: Vec<CellRect> = rooms.values().map(|room| room.footprint).collect();
    let context = RouteContext { bounds: request.bounds, footprints: &footprints };

    let mut current = pending.remove(rng.below(pending.len()));
    while !pending.is_empty() {
        let Some(next_index) = nearest_pending(rooms, current, &pending) else {
            log::warn!(
                "corridor walk stopped with {} room(s) unreachable from the connected set",
                pending.len()
            );
            report.unreached = pending;
            break;
        };
        let next = pending.remove(next_index);

        let path = request.router.route(&context, &rooms[current], &rooms[next], rng);
        let carved = carve_path(&mut layer, &path, &footprints, request.corridor_tile);
        log::debug!(
            "linked '{}' to '{}' with {:?} corridor",
            rooms[current].name,
            rooms[next].name,
            path.kind
        );
        report.edges.push(CorridorEdge { from: current, to: next, kind: path.kind, carved });

        current = next;
    }

    (layer, report)
}

/// Index into `pending` of the room whose centre is closest to `current`'s centre.
/// Ties keep the first room encountered.
fn nearest_pending(
    rooms: &SlotMap<RoomId, PlacedRoom>,
    current: RoomId,
    pending: &[RoomId],
) -> Option<usize> {
    let origin = rooms.get(current)?.center();
    let mut best: Option<(f64, usize)> = None;
    for (index, &candidate) in pending.iter().enumerate() {
        let Some(room) = rooms.get(candidate) else {
            continue;
        };
        let distance = origin.distance(room.center());
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, index));
        }
    }
    best.map(|(_, index)| index)
}

/// Writes every path cell that is not under a room. Returns how many cells were written.
fn carve_path(
    layer: &mut Layer,
    path: &CorridorPath,
    footprints: &[CellRect],
    tile: TileId,
) -> usize {
    let mut carved = 0;
    for &cell in &path.cells {
        if footprints.iter().any(|footprint| footprint.contains(cell)) {
            continue;
        }
        layer.set(cell, tile);
        carved += 1;
    }
    carved
}
