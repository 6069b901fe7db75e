//! Configuration errors reported by generation stages before any layer is touched.

use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// A stage ran before `set_map_size` stored any bounds.
    MapSizeNotSet,
    /// Width or height was zero or negative.
    InvalidMapSize { width: i32, height: i32 },
    /// The void catalog handed to the void filler was empty.
    NoTilesConfigured,
    /// A room template cannot be placed as described.
    InvalidTemplate { name: String, reason: String },
}

impl GenerationError {
    /// Every variant describes bad input rather than a runtime failure.
    pub fn is_invalid_configuration(&self) -> bool {
        match self {
            Self::MapSizeNotSet
            | Self::InvalidMapSize { .. }
            | Self::NoTilesConfigured
            | Self::InvalidTemplate { .. } => true,
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapSizeNotSet => write!(f, "map size has not been set"),
            Self::InvalidMapSize { width, height } => {
                write!(f, "invalid map size {width}x{height}: both sides must be positive")
            }
            Self::NoTilesConfigured => write!(f, "no void tiles configured"),
            Self::InvalidTemplate { name, reason } => {
                write!(f, "invalid room template '{name}': {reason}")
            }
        }
    }
}

impl Error for GenerationError {}
