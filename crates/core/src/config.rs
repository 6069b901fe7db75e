//! Serializable description of one complete generation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::mapgen::{CorridorStrategy, MapBounds, RoomTemplate};
use crate::types::{TileId, TilePalette};

pub const DEFAULT_TARGET_ROOMS: usize = 10;
pub const DEFAULT_MIN_SPACING: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonConfig {
    #[serde(default)]
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub palette: TilePalette,
    pub void_tiles: Vec<TileId>,
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
    #[serde(default = "default_target_rooms")]
    pub target_rooms: usize,
    #[serde(default = "default_min_spacing")]
    pub min_spacing: i32,
    #[serde(default)]
    pub strategy: CorridorStrategy,
    #[serde(default = "default_resolve_doors")]
    pub resolve_doors: bool,
}

/// A room template as written in a config file: either text rows with a legend, or a plain
/// rectangle given by `width`, `height` and `floor`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,
    pub wall: TileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<TileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    /// Top row first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<String>,
    /// Single-character keys mapping row symbols to tiles.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub legend: BTreeMap<String, TileId>,
    #[serde(default = "default_spawn_limit")]
    pub spawn_limit: u32,
    #[serde(default)]
    pub allow_rotation: bool,
}

fn default_target_rooms() -> usize {
    DEFAULT_TARGET_ROOMS
}

fn default_min_spacing() -> i32 {
    DEFAULT_MIN_SPACING
}

fn default_resolve_doors() -> bool {
    true
}

fn default_spawn_limit() -> u32 {
    1
}

impl DungeonConfig {
    /// Checks everything a run would reject, without running it.
    pub fn validate(&self) -> Result<(), GenerationError> {
        MapBounds::new(self.width, self.height)?;
        if self.void_tiles.is_empty() {
            return Err(GenerationError::NoTilesConfigured);
        }
        self.room_templates().map(|_| ())
    }

    pub fn room_templates(&self) -> Result<Vec<RoomTemplate>, GenerationError> {
        self.templates.iter().map(TemplateConfig::to_template).collect()
    }
}

impl TemplateConfig {
    pub fn to_template(&self) -> Result<RoomTemplate, GenerationError> {
        let template = if self.rows.is_empty() {
            self.rectangle()?
        } else {
            let legend = self.legend_symbols()?;
            let rows: Vec<&str> = self.rows.iter().map(String::as_str).collect();
            RoomTemplate::from_rows(self.name.as_str(), &rows, &legend, self.wall)?
        };
        Ok(template.with_spawn_limit(self.spawn_limit).with_rotation(self.allow_rotation))
    }

    fn rectangle(&self) -> Result<RoomTemplate, GenerationError> {
        match (self.width, self.height, self.floor) {
            (Some(width), Some(height), Some(floor)) => {
                let template =
                    RoomTemplate::rectangular(self.name.as_str(), width, height, self.wall, floor);
                template.validate()?;
                Ok(template)
            }
            _ => Err(self.invalid("needs either rows or width, height and floor")),
        }
    }

    fn legend_symbols(&self) -> Result<Vec<(char, TileId)>, GenerationError> {
        self.legend
            .iter()
            .map(|(key, &tile)| {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(symbol), None) => Ok((symbol, tile)),
                    _ => {
                        Err(self.invalid(&format!("legend key '{key}' is not a single character")))
                    }
                }
            })
            .collect()
    }

    fn invalid(&self, reason: &str) -> GenerationError {
        GenerationError::InvalidTemplate { name: self.name.clone(), reason: reason.to_string() }
    }
}
