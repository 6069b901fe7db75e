//! Door carving where finished corridors meet room walls.

use slotmap::SlotMap;

use crate::types::TileId;

use super::layer::Layer;
use super::room::{PlacedRoom, RoomId};

/// Replaces every room wall tile orthogonally adjacent to a corridor tile with `door`.
/// Returns the number of walls opened; a second pass over the same map opens none.
pub(super) fn resolve_doors(
    corridors: &Layer,
    rooms: &mut SlotMap<RoomId, PlacedRoom>,
    door: TileId,
) -> usize {
    let mut opened = 0;
    for &corridor in corridors.positions() {
        for neighbor in corridor.neighbors() {
            let Some(room) = rooms.values_mut().find(|room| room.footprint.contains(neighbor))
            else {
                continue;
            };
            if room.carve_door(neighbor, door) {
                opened += 1;
            }
        }
    }
    opened
}
