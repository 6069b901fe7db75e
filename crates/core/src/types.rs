use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    /// Orthogonal neighbours in up, right, down, left order.
    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }

    pub fn distance(self, other: Pos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Opaque tile identifier. The caller decides what each id renders as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

/// Tiles the generator writes on its own (everything else comes from catalogs and templates).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePalette {
    pub corridor: TileId,
    pub door: TileId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] =
        [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Effective `(width, height)` of a `width x height` footprint after rotation.
    pub fn apply_to_size(self, width: i32, height: i32) -> (i32, i32) {
        if self.swaps_axes() { (height, width) } else { (width, height) }
    }

    /// Maps a local cell of a `width x height` footprint to its rotated local cell
    /// (counter-clockwise, origin at the bottom-left corner).
    pub fn rotate_local(self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        match self {
            Self::Deg0 => (x, y),
            Self::Deg90 => (height - 1 - y, x),
            Self::Deg180 => (width - 1 - x, height - 1 - y),
            Self::Deg270 => (y, width - 1 - x),
        }
    }
}
