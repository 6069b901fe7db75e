pub mod config;
pub mod error;
pub mod mapgen;
pub mod registry;
pub mod types;

pub use config::{DungeonConfig, TemplateConfig};
pub use error::GenerationError;
pub use mapgen::{
    CorridorStrategy, DungeonGenerator, GeneratedDungeon, GenerationProgress, Layer, MapBounds,
    PlacedRoom, RoomId, RoomTemplate, generate_dungeon,
};
pub use registry::GeneratorRegistry;
pub use types::*;
