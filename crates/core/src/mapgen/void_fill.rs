//! Background fill: every cell of the map gets a random tile from the void catalog.

use crate::error::GenerationError;
use crate::types::TileId;

use super::grid::MapBounds;
use super::layer::Layer;
use super::seed::GenRng;

pub(super) fn fill_void(
    bounds: MapBounds,
    catalog: &[TileId],
    rng: &mut GenRng,
) -> Result<Layer, GenerationError> {
    let mut layer = Layer::new();
    for pos in bounds.cells() {
        let &tile = rng.pick(catalog).ok_or(GenerationError::NoTilesConfigured)?;
        layer.set(pos, tile);
    }
    Ok(layer)
}
