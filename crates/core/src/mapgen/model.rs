//! Finished-dungeon snapshot handed to renderers, exporters, and determinism checks.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, TileId};

use super::grid::MapBounds;
use super::layer::Layer;
use super::room::PlacedRoom;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDungeon {
    pub generator_id: u32,
    pub seed: u64,
    pub bounds: MapBounds,
    pub void_layer: Layer,
    pub corridor_layer: Layer,
    /// In placement order.
    pub rooms: Vec<PlacedRoom>,
}

impl GeneratedDungeon {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.bounds.width().to_le_bytes());
        bytes.extend(self.bounds.height().to_le_bytes());
        push_layer(&mut bytes, &self.void_layer);
        push_layer(&mut bytes, &self.corridor_layer);

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend((room.template as u32).to_le_bytes());
            bytes.extend(room.anchor.y.to_le_bytes());
            bytes.extend(room.anchor.x.to_le_bytes());
            bytes.extend(room.rotation.degrees().to_le_bytes());
            push_layer(&mut bytes, room.tiles());
        }
        bytes
    }

    /// Stable hash of `canonical_bytes`; identical inputs give identical fingerprints.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Topmost tile at `pos`: room tiles over corridors over void.
    pub fn tile_at(&self, pos: Pos) -> Option<TileId> {
        self.rooms
            .iter()
            .find_map(|room| room.tile_at(pos))
            .or_else(|| self.corridor_layer.get(pos))
            .or_else(|| self.void_layer.get(pos))
    }

    /// Every room's tiles merged into one layer.
    pub fn room_layer(&self) -> Layer {
        let mut merged = Layer::new();
        for room in &self.rooms {
            merged.overlay(room.tiles());
        }
        merged
    }

    /// Indices of rooms that cannot be reached from the first room by walking corridor
    /// tiles. A corridor tile next to a footprint counts as an entrance to that room.
    pub fn disconnected_rooms(&self) -> Vec<usize> {
        if self.rooms.len() < 2 {
            return Vec::new();
        }

        let mut reached = BTreeSet::from([0_usize]);
        let mut seen: BTreeSet<Pos> = BTreeSet::new();
        let mut open: VecDeque<Pos> = VecDeque::new();
        self.enqueue_entrances(0, &mut seen, &mut open);

        while let Some(pos) = open.pop_front() {
            for (index, room) in self.rooms.iter().enumerate() {
                if room.footprint.touches(pos) && reached.insert(index) {
                    self.enqueue_entrances(index, &mut seen, &mut open);
                }
            }
            for next in pos.neighbors() {
                if self.corridor_layer.contains(next) && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }

        (0..self.rooms.len()).filter(|index| !reached.contains(index)).collect()
    }

    fn enqueue_entrances(&self, room: usize, seen: &mut BTreeSet<Pos>, open: &mut VecDeque<Pos>) {
        let footprint = self.rooms[room].footprint;
        for &pos in self.corridor_layer.positions() {
            if footprint.touches(pos) && seen.insert(pos) {
                open.push_back(pos);
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn push_layer(bytes: &mut Vec<u8>, layer: &Layer) {
    bytes.extend((layer.len() as u32).to_le_bytes());
    for (pos, tile) in layer.iter() {
        bytes.extend(pos.y.to_le_bytes());
        bytes.extend(pos.x.to_le_bytes());
        bytes.extend(tile.0.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::room::RoomTemplate;
    use crate::types::Rotation;

    fn sample() -> GeneratedDungeon {
        let template = RoomTemplate::rectangular("cell", 3, 3, TileId(1), TileId(2));
        let bounds = MapBounds::new(8, 8).expect("valid size");
        GeneratedDungeon {
            generator_id: 1,
            seed: 42,
            bounds,
            void_layer: bounds.cells().map(|pos| (pos, TileId(0))).collect(),
            corridor_layer: [(Pos::new(2, 0), TileId(5))].into_iter().collect(),
            rooms: vec![PlacedRoom::instantiate(0, &template, Pos::new(0, 0), Rotation::Deg0)],
        }
    }

    #[test]
    fn tiles_stack_rooms_over_corridors_over_void() {
        let dungeon = sample();
        assert_eq!(dungeon.tile_at(Pos::new(0, 0)), Some(TileId(2)));
        assert_eq!(dungeon.tile_at(Pos::new(1, 0)), Some(TileId(1)));
        assert_eq!(dungeon.tile_at(Pos::new(2, 0)), Some(TileId(5)));
        assert_eq!(dungeon.tile_at(Pos::new(3, 3)), Some(TileId(0)));
        assert_eq!(dungeon.tile_at(Pos::new(40, 0)), None);
    }

    #[test]
    fn fingerprint_tracks_layout_changes() {
        let baseline = sample();
        let mut moved = sample();
        moved.corridor_layer.set(Pos::new(3, 0), TileId(5));
        assert_eq!(baseline.fingerprint(), sample().fingerprint());
        assert_ne!(baseline.fingerprint(), moved.fingerprint());
    }

    #[test]
    fn rooms_joined_by_a_corridor_are_connected() {
        let template = RoomTemplate::rectangular("cell", 3, 3, TileId(1), TileId(2));
        let mut dungeon = sample();
        dungeon.rooms.push(PlacedRoom::instantiate(0, &template, Pos::new(6, 0), Rotation::Deg0));
        assert_eq!(dungeon.disconnected_rooms(), vec![1]);

        for x in 2..=4 {
            dungeon.corridor_layer.set(Pos::new(x, 0), TileId(5));
        }
        assert!(dungeon.disconnected_rooms().is_empty());
    }

    #[test]
    fn json_export_reloads_to_the_same_snapshot() {
        let dungeon = sample();
        let json = dungeon.to_json().expect("serialize");
        let decoded: GeneratedDungeon = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.fingerprint(), dungeon.fingerprint());
    }
}
