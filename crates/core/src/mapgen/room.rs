//! Room templates supplied by the caller and the rooms instantiated from them.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::error::GenerationError;
use crate::types::{Pos, Rotation, TileId};

use super::grid::CellRect;
use super::layer::Layer;

/// Largest footprint a template may cover, in cells.
pub const MAX_TEMPLATE_CELLS: usize = 1 << 20;

new_key_type! {
    pub struct RoomId;
}

/// Immutable room definition. Placement counters live with the placement run, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// Row-major, bottom row first. `None` marks an empty cell inside the footprint.
    pub tiles: Vec<Option<TileId>>,
    /// Tile that door carving may replace.
    pub wall_tile: TileId,
    pub spawn_limit: u32,
    pub allow_rotation: bool,
}

impl RoomTemplate {
    /// Wall ring around a solid floor interior.
    pub fn rectangular(
        name: impl Into<String>,
        width: i32,
        height: i32,
        wall_tile: TileId,
        floor_tile: TileId,
    ) -> Self {
        // Oversized footprints keep no tiles and fail `validate`.
        let cells = footprint_cells(width, height).unwrap_or(0);
        let mut tiles = Vec::with_capacity(cells);
        let rows = if cells > 0 { height } else { 0 };
        for y in 0..rows {
            for x in 0..width {
                let on_edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                tiles.push(Some(if on_edge { wall_tile } else { floor_tile }));
            }
        }
        Self {
            name: name.into(),
            width,
            height,
            tiles,
            wall_tile,
            spawn_limit: 1,
            allow_rotation: false,
        }
    }

    /// Builds a footprint from text rows, top row first, mapping each character through
    /// `legend`. Characters missing from the legend become empty cells.
    pub fn from_rows(
        name: impl Into<String>,
        rows: &[&str],
        legend: &[(char, TileId)],
        wall_tile: TileId,
    ) -> Result<Self, GenerationError> {
        let name = name.into();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if let Some(bad_row) = rows.iter().position(|row| row.chars().count() != width) {
            return Err(GenerationError::InvalidTemplate {
                name,
                reason: format!("row {bad_row} is not {width} cells wide"),
            });
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for row in rows.iter().rev() {
            for symbol in row.chars() {
                let tile = legend.iter().find(|(key, _)| *key == symbol).map(|&(_, tile)| tile);
                tiles.push(tile);
            }
        }

        let template = Self {
            name,
            width: width as i32,
            height: rows.len() as i32,
            tiles,
            wall_tile,
            spawn_limit: 1,
            allow_rotation: false,
        };
        template.validate()?;
        Ok(template)
    }

    pub fn with_spawn_limit(mut self, spawn_limit: u32) -> Self {
        self.spawn_limit = spawn_limit;
        self
    }

    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        let cells = footprint_cells(self.width, self.height);
        let reason = if self.width <= 0 || self.height <= 0 {
            Some(format!("footprint {}x{} is empty", self.width, self.height))
        } else if cells.is_none() {
            Some(format!(
                "footprint {}x{} is too large (at most {MAX_TEMPLATE_CELLS} cells)",
                self.width, self.height
            ))
        } else if cells != Some(self.tiles.len()) {
            Some(format!(
                "expected {} tiles for a {}x{} footprint, found {}",
                cells.unwrap_or_default(),
                self.width,
                self.height,
                self.tiles.len()
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                Err(GenerationError::InvalidTemplate { name: self.name.clone(), reason })
            }
            None => Ok(()),
        }
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize).copied().flatten()
    }

    pub fn rotated_size(&self, rotation: Rotation) -> (i32, i32) {
        rotation.apply_to_size(self.width, self.height)
    }
}

/// Cell count of a `width x height` footprint, or `None` when either side is not positive
/// or the area exceeds `MAX_TEMPLATE_CELLS`.
fn footprint_cells(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let cells = usize::try_from(width.checked_mul(height)?).ok()?;
    (cells <= MAX_TEMPLATE_CELLS).then_some(cells)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    /// Index of the template in the slice handed to placement.
    pub template: usize,
    pub name: String,
    pub anchor: Pos,
    pub rotation: Rotation,
    pub footprint: CellRect,
    pub wall_tile: TileId,
    tiles: Layer,
    pristine: Layer,
}

impl PlacedRoom {
    pub fn instantiate(
        template_index: usize,
        template: &RoomTemplate,
        anchor: Pos,
        rotation: Rotation,
    ) -> Self {
        let (width, height) = template.rotated_size(rotation);
        let footprint = CellRect::centered_at(anchor, width, height);

        let mut tiles = Layer::new();
        for y in 0..template.height {
            for x in 0..template.width {
                let Some(tile) = template.tile_at(x, y) else {
                    continue;
                };
                let (rx, ry) = rotation.rotate_local(x, y, template.width, template.height);
                tiles.set(Pos { y: footprint.y + ry, x: footprint.x + rx }, tile);
            }
        }

        Self {
            template: template_index,
            name: template.name.clone(),
            anchor,
            rotation,
            footprint,
            wall_tile: template.wall_tile,
            pristine: tiles.clone(),
            tiles,
        }
    }

    pub fn center(&self) -> Pos {
        self.footprint.center()
    }

    /// World-space tiles, including any doors carved so far.
    pub fn tiles(&self) -> &Layer {
        &self.tiles
    }

    pub fn tile_at(&self, pos: Pos) -> Option<TileId> {
        self.tiles.get(pos)
    }

    /// Tile at `pos` as instantiated, ignoring carved doors.
    pub fn pristine_tile(&self, pos: Pos) -> Option<TileId> {
        self.pristine.get(pos)
    }

    /// Replaces a wall tile at `pos` with `door`. Returns whether anything changed.
    pub fn carve_door(&mut self, pos: Pos, door: TileId) -> bool {
        if self.tiles.get(pos) != Some(self.wall_tile) {
            return false;
        }
        self.tiles.set(pos, door);
        true
    }

    /// Restores the tiles the room was instantiated with.
    pub fn clear_doors(&mut self) {
        self.tiles = self.pristine.clone();
    }
}
