//! Sparse tile layers keyed by grid position.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::types::{Pos, TileId};

/// At most one tile per position. Iteration is in `Pos` order (row by row).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LayerCell>", into = "Vec<LayerCell>")]
pub struct Layer {
    tiles: BTreeMap<Pos, TileId>,
}

/// Flat form used for serialization, since JSON map keys must be strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCell {
    pub x: i32,
    pub y: i32,
    pub tile: TileId,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Pos) -> Option<TileId> {
        self.tiles.get(&pos).copied()
    }

    /// Writes `tile` at `pos`, returning the tile it replaced.
    pub fn set(&mut self, pos: Pos, tile: TileId) -> Option<TileId> {
        self.tiles.insert(pos, tile)
    }

    pub fn remove(&mut self, pos: Pos) -> Option<TileId> {
        self.tiles.remove(&pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, TileId)> + '_ {
        self.tiles.iter().map(|(&pos, &tile)| (pos, tile))
    }

    pub fn positions(&self) -> btree_map::Keys<'_, Pos, TileId> {
        self.tiles.keys()
    }

    /// Copies every tile of `other` over this layer.
    pub fn overlay(&mut self, other: &Layer) {
        self.tiles.extend(other.iter());
    }
}

impl From<Vec<LayerCell>> for Layer {
    fn from(cells: Vec<LayerCell>) -> Self {
        let tiles =
            cells.into_iter().map(|cell| (Pos { y: cell.y, x: cell.x }, cell.tile)).collect();
        Self { tiles }
    }
}

impl From<Layer> for Vec<LayerCell> {
    fn from(layer: Layer) -> Self {
        layer.iter().map(|(pos, tile)| LayerCell { x: pos.x, y: pos.y, tile }).collect()
    }
}

impl FromIterator<(Pos, TileId)> for Layer {
    fn from_iter<I: IntoIterator<Item = (Pos, TileId)>>(iter: I) -> Self {
        Self { tiles: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_cell_twice_keeps_one_tile() {
        let mut layer = Layer::new();
        assert_eq!(layer.set(Pos::new(1, 2), TileId(3)), None);
        assert_eq!(layer.set(Pos::new(1, 2), TileId(4)), Some(TileId(3)));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.get(Pos::new(1, 2)), Some(TileId(4)));
    }

    #[test]
    fn layers_serialize_as_flat_cell_lists() {
        let layer: Layer = [(Pos::new(-1, 0), TileId(7)), (Pos::new(2, 5), TileId(9))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&layer).expect("serialize");
        assert_eq!(json, r#"[{"x":-1,"y":0,"tile":7},{"x":2,"y":5,"tile":9}]"#);
        let decoded: Layer = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, layer);
    }
}
