//! Procedural dungeon generation split into one submodule per stage.

pub mod model;

mod connect;
mod corridor;
mod doors;
mod generator;
mod grid;
mod layer;
mod placement;
mod room;
mod seed;
mod void_fill;

pub use connect::{CorridorEdge, CorridorReport};
pub use corridor::{
    CorridorPath, CorridorRouter, CorridorStrategy, MazeRouter, RouteContext, RouteKind, Segment,
    StraightRouter,
};
pub use generator::{DungeonGenerator, GenerationProgress};
pub use grid::{CellRect, MapBounds};
pub use layer::{Layer, LayerCell};
pub use model::GeneratedDungeon;
pub use placement::{
    ATTEMPTS_PER_PLACEMENT, MAX_PLACEMENT_FAILURES, PlacementReport, PlacementStop,
};
pub use room::{MAX_TEMPLATE_CELLS, PlacedRoom, RoomId, RoomTemplate};
pub use seed::{GenRng, mix_seed_stream};

use crate::config::DungeonConfig;
use crate::error::GenerationError;

/// Runs every stage for `config` on a fresh generator and returns the finished layout.
pub fn generate_dungeon(config: &DungeonConfig) -> Result<GeneratedDungeon, GenerationError> {
    let templates = config.room_templates()?;

    let mut generator = DungeonGenerator::new(1, config.seed, config.palette);
    generator.set_corridor_strategy(config.strategy);
    generator.set_map_size(config.width, config.height)?;
    generator.create_void_tiles(&config.void_tiles)?;
    generator.generate_rooms(&templates, config.target_rooms, config.min_spacing)?;
    generator.generate_corridors()?;
    if config.resolve_doors {
        generator.resolve_doors();
    }

    generator.snapshot().ok_or(GenerationError::MapSizeNotSet)
}
