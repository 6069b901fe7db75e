//! Stateful generator that owns the layers, rooms, and random source across stages.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::GenerationError;
use crate::types::{TileId, TilePalette};

use super::connect::{ConnectRequest, CorridorReport, connect_rooms};
use super::corridor::CorridorStrategy;
use super::doors::resolve_doors;
use super::grid::MapBounds;
use super::layer::Layer;
use super::model::GeneratedDungeon;
use super::placement::{PlacementReport, PlacementRequest, place_rooms};
use super::room::{PlacedRoom, RoomId, RoomTemplate};
use super::seed::GenRng;
use super::void_fill::fill_void;

/// Which stages currently hold output. Resets clear the affected flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub void_filled: bool,
    pub rooms_placed: bool,
    pub corridors_carved: bool,
    pub doors_resolved: bool,
}

/// Each stage regenerates from scratch: it clears its own output and everything built on
/// top of it before writing. Not meant to be shared between threads; give independent maps
/// their own generator and seed.
pub struct DungeonGenerator {
    id: u32,
    rng: GenRng,
    palette: TilePalette,
    strategy: CorridorStrategy,
    bounds: Option<MapBounds>,
    void_layer: Layer,
    corridor_layer: Layer,
    rooms: SlotMap<RoomId, PlacedRoom>,
    spawn_counts: Vec<u32>,
    progress: GenerationProgress,
}

impl DungeonGenerator {
    pub fn new(id: u32, seed: u64, palette: TilePalette) -> Self {
        Self {
            id,
            rng: GenRng::new(seed),
            palette,
            strategy: CorridorStrategy::default(),
            bounds: None,
            void_layer: Layer::new(),
            corridor_layer: Layer::new(),
            rooms: SlotMap::with_key(),
            spawn_counts: Vec::new(),
            progress: GenerationProgress::default(),
        }
    }

    /// Caller-facing handle used to find this generator again; plays no part in generation.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Rewinds the random source so the next stages replay from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    pub fn palette(&self) -> TilePalette {
        self.palette
    }

    pub fn corridor_strategy(&self) -> CorridorStrategy {
        self.strategy
    }

    pub fn set_corridor_strategy(&mut self, strategy: CorridorStrategy) {
        self.strategy = strategy;
    }

    pub fn set_map_size(&mut self, width: i32, height: i32) -> Result<(), GenerationError> {
        self.bounds = Some(MapBounds::new(width, height)?);
        Ok(())
    }

    pub fn bounds(&self) -> Option<MapBounds> {
        self.bounds
    }

    pub fn progress(&self) -> GenerationProgress {
        self.progress
    }

    pub fn void_layer(&self) -> &Layer {
        &self.void_layer
    }

    pub fn corridor_layer(&self) -> &Layer {
        &self.corridor_layer
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &PlacedRoom)> {
        self.rooms.iter()
    }

    pub fn room(&self, id: RoomId) -> Option<&PlacedRoom> {
        self.rooms.get(id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Instances placed per template during the last placement pass.
    pub fn spawn_counts(&self) -> &[u32] {
        &self.spawn_counts
    }

    /// Every room's tiles merged into one layer.
    pub fn room_tiles(&self) -> Layer {
        let mut merged = Layer::new();
        for room in self.rooms.values() {
            merged.overlay(room.tiles());
        }
        merged
    }

    /// Full reset followed by a fresh background fill. An empty catalog is rejected before
    /// anything is cleared.
    pub fn create_void_tiles(&mut self, catalog: &[TileId]) -> Result<(), GenerationError> {
        let bounds = self.require_bounds()?;
        if catalog.is_empty() {
            return Err(GenerationError::NoTilesConfigured);
        }

        log::info!("generating void space for {}x{} map", bounds.width(), bounds.height());
        self.reset_map();
        self.void_layer = fill_void(bounds, catalog, &mut self.rng)?;
        self.progress.void_filled = true;
        Ok(())
    }

    /// Clears rooms and corridors, then places up to `target_count` rooms. Running short of
    /// the target is reported in the returned report, never as an error.
    pub fn generate_rooms(
        &mut self,
        templates: &[RoomTemplate],
        target_count: usize,
        min_spacing: i32,
    ) -> Result<PlacementReport, GenerationError> {
        let bounds = self.require_bounds()?;
        for template in templates {
            template.validate()?;
        }

        log::info!("generating up to {target_count} rooms from {} template(s)", templates.len());
        self.reset_rooms();
        self.reset_corridors();

        let request = PlacementRequest { bounds, templates, target_count, min_spacing };
        let (rooms, report) = place_rooms(&request, &mut self.rng);
        for room in rooms {
            self.rooms.insert(room);
        }
        self.spawn_counts.clone_from(&report.spawn_counts);
        self.progress.rooms_placed = true;

        if report.budget_exhausted() {
            log::warn!(
                "placed {} of {} rooms before stopping ({:?})",
                report.placed,
                report.target,
                report.stop
            );
        }
        Ok(report)
    }

    /// Clears corridors and any doors they opened, then links every room with the
    /// configured router.
    pub fn generate_corridors(&mut self) -> Result<CorridorReport, GenerationError> {
        let bounds = self.require_bounds()?;

        log::info!("generating corridors between {} room(s)", self.rooms.len());
        self.reset_corridors();

        let router = self.strategy.router();
        let request = ConnectRequest {
            bounds,
            rooms: &self.rooms,
            router: router.as_ref(),
            corridor_tile: self.palette.corridor,
        };
        let (layer, report) = connect_rooms(&request, &mut self.rng);
        self.corridor_layer = layer;
        self.progress.corridors_carved = true;
        Ok(report)
    }

    /// Opens doors where corridors touch room walls. Returns the number of doors carved.
    pub fn resolve_doors(&mut self) -> usize {
        let opened = resolve_doors(&self.corridor_layer, &mut self.rooms, self.palette.door);
        self.progress.doors_resolved = true;
        log::debug!("opened {opened} door(s)");
        opened
    }

    /// Clears every layer and room. Safe to call repeatedly.
    pub fn reset_map(&mut self) {
        self.void_layer.clear();
        self.progress.void_filled = false;
        self.reset_rooms();
        self.reset_corridors();
    }

    pub fn snapshot(&self) -> Option<GeneratedDungeon> {
        let bounds = self.bounds?;
        Some(GeneratedDungeon {
            generator_id: self.id,
            seed: self.rng.seed(),
            bounds,
            void_layer: self.void_layer.clone(),
            corridor_layer: self.corridor_layer.clone(),
            rooms: self.rooms.values().cloned().collect(),
        })
    }

    fn require_bounds(&self) -> Result<MapBounds, GenerationError> {
        self.bounds.ok_or(GenerationError::MapSizeNotSet)
    }

    fn reset_rooms(&mut self) {
        // A fresh map keeps iteration order equal to insertion order.
        self.rooms = SlotMap::with_key();
        self.spawn_counts.fill(0);
        self.progress.rooms_placed = false;
    }

    fn reset_corridors(&mut self) {
        self.corridor_layer.clear();
        for room in self.rooms.values_mut() {
            room.clear_doors();
        }
        self.progress.corridors_carved = false;
        self.progress.doors_resolved = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use proptest::prelude::*;

    use super::*;

    const PALETTE: TilePalette = TilePalette { corridor: TileId(100), door: TileId(101) };
    const VOID: [TileId; 3] = [TileId(1), TileId(2), TileId(3)];
    const WALL: TileId = TileId(10);
    const FLOOR: TileId = TileId(11);

    fn templates() -> Vec<RoomTemplate> {
        vec![
            RoomTemplate::rectangular("closet", 4, 4, WALL, FLOOR).with_spawn_limit(4),
            RoomTemplate::rectangular("gallery", 8, 4, WALL, FLOOR)
                .with_spawn_limit(3)
                .with_rotation(true),
            RoomTemplate::rectangular("hall", 6, 6, WALL, FLOOR).with_spawn_limit(2),
        ]
    }

    fn generated(seed: u64, strategy: CorridorStrategy) -> DungeonGenerator {
        let mut generator = DungeonGenerator::new(1, seed, PALETTE);
        generator.set_corridor_strategy(strategy);
        generator.set_map_size(48, 40).expect("valid size");
        generator.create_void_tiles(&VOID).expect("void catalog is non-empty");
        generator.generate_rooms(&templates(), 8, 1).expect("templates are valid");
        generator.generate_corridors().expect("map size is set");
        generator
    }

    fn rooms_connected(generator: &DungeonGenerator) -> bool {
        generator.snapshot().is_some_and(|snapshot| snapshot.disconnected_rooms().is_empty())
    }

    #[test]
    fn stages_require_a_map_size() {
        let mut generator = DungeonGenerator::new(1, 0, PALETTE);
        assert_eq!(generator.create_void_tiles(&VOID), Err(GenerationError::MapSizeNotSet));
        assert_eq!(
            generator.generate_rooms(&templates(), 3, 1).map(|report| report.placed),
            Err(GenerationError::MapSizeNotSet)
        );
        assert_eq!(
            generator.generate_corridors().map(|report| report.edges.len()),
            Err(GenerationError::MapSizeNotSet)
        );
    }

    #[test]
    fn invalid_size_keeps_previous_bounds() {
        let mut generator = DungeonGenerator::new(1, 0, PALETTE);
        generator.set_map_size(10, 10).expect("valid size");
        let err = generator.set_map_size(-1, 10).expect_err("negative width");
        assert!(err.is_invalid_configuration());
        assert_eq!(generator.bounds(), MapBounds::new(10, 10).ok());
    }

    #[test]
    fn empty_void_catalog_leaves_the_map_untouched() {
        let mut generator = generated(5, CorridorStrategy::Straight);
        let before = generator.snapshot().expect("map size is set");

        assert_eq!(generator.create_void_tiles(&[]), Err(GenerationError::NoTilesConfigured));
        assert_eq!(generator.snapshot(), Some(before));
    }

    #[test]
    fn void_fill_resets_rooms_and_corridors() {
        let mut generator = generated(6, CorridorStrategy::Straight);
        assert!(generator.room_count() > 0);

        generator.create_void_tiles(&VOID).expect("void catalog is non-empty");
        assert_eq!(generator.room_count(), 0);
        assert!(generator.corridor_layer().is_empty());
        assert_eq!(generator.void_layer().len(), 48 * 40);
        assert!(generator.spawn_counts().iter().all(|&count| count == 0));
    }

    #[test]
    fn regenerating_rooms_clears_old_corridors() {
        let mut generator = generated(7, CorridorStrategy::Straight);
        let void_before = generator.void_layer().clone();

        generator.generate_rooms(&templates(), 2, 1).expect("templates are valid");
        assert!(generator.corridor_layer().is_empty());
        assert!(generator.room_count() <= 2);
        assert_eq!(generator.void_layer(), &void_before);
        assert!(!generator.progress().corridors_carved);
    }

    #[test]
    fn invalid_template_is_rejected_before_reset() {
        let mut generator = generated(8, CorridorStrategy::Straight);
        let rooms_before = generator.room_count();
        let broken = [RoomTemplate::rectangular("flat", 4, 0, WALL, FLOOR)];

        let err = generator.generate_rooms(&broken, 3, 1).expect_err("empty footprint");
        assert!(matches!(err, GenerationError::InvalidTemplate { .. }));
        assert_eq!(generator.room_count(), rooms_before);
    }

    #[test]
    fn zero_templates_place_zero_rooms() {
        let mut generator = DungeonGenerator::new(3, 99, PALETTE);
        generator.set_map_size(10, 10).expect("valid size");
        let report = generator.generate_rooms(&[], 5, 1).expect("no templates is not an error");
        assert_eq!(report.placed, 0);
        assert!(generator.corridor_layer().is_empty());

        let corridors = generator.generate_corridors().expect("map size is set");
        assert!(corridors.edges.is_empty());
        assert!(generator.corridor_layer().is_empty());
    }

    #[test]
    fn single_room_gets_no_corridors() {
        let mut generator = DungeonGenerator::new(3, 4, PALETTE);
        generator.set_map_size(20, 20).expect("valid size");
        let only = [RoomTemplate::rectangular("solo", 5, 5, WALL, FLOOR)];
        let report = generator.generate_rooms(&only, 3, 1).expect("templates are valid");
        assert_eq!(report.placed, 1);

        let corridors = generator.generate_corridors().expect("map size is set");
        assert!(corridors.edges.is_empty());
        assert!(generator.corridor_layer().is_empty());
    }

    #[test]
    fn reset_twice_matches_reset_once() {
        let mut once = generated(9, CorridorStrategy::Straight);
        once.reset_map();
        let mut twice = generated(9, CorridorStrategy::Straight);
        twice.reset_map();
        twice.reset_map();

        assert_eq!(once.snapshot(), twice.snapshot());
        assert!(twice.void_layer().is_empty());
        assert!(twice.corridor_layer().is_empty());
        assert_eq!(twice.room_count(), 0);
        assert_eq!(twice.progress(), GenerationProgress::default());
    }

    #[test]
    fn door_resolution_is_idempotent_and_rolled_back_by_new_corridors() {
        let mut generator = generated(10, CorridorStrategy::Straight);
        let pristine = generator.room_tiles();

        let opened = generator.resolve_doors();
        assert!(opened > 0);
        let after_once = generator.room_tiles();
        assert_eq!(generator.resolve_doors(), 0);
        assert_eq!(generator.room_tiles(), after_once);

        generator.reseed(10);
        generator.generate_corridors().expect("map size is set");
        assert!(!generator.progress().doors_resolved);
        assert_eq!(generator.room_tiles(), pristine);
    }

    #[test]
    fn doors_sit_on_walls_next_to_corridors() {
        let mut generator = generated(11, CorridorStrategy::Straight);
        generator.resolve_doors();
        for (_, room) in generator.rooms() {
            for (pos, _) in room.tiles().iter().filter(|&(_, tile)| tile == PALETTE.door) {
                assert_eq!(room.pristine_tile(pos), Some(WALL));
                assert!(
                    pos.neighbors().iter().any(|next| generator.corridor_layer().contains(*next)),
                    "door at {pos:?} has no corridor neighbour"
                );
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        for strategy in [CorridorStrategy::Straight, CorridorStrategy::Maze] {
            let left = generated(1234, strategy).snapshot().expect("map size is set");
            let right = generated(1234, strategy).snapshot().expect("map size is set");
            assert_eq!(left, right);
            assert_eq!(left.fingerprint(), right.fingerprint());
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let fingerprints: BTreeSet<u64> = (0..8)
            .map(|seed| generated(seed, CorridorStrategy::Straight))
            .filter_map(|generator| generator.snapshot())
            .map(|snapshot| snapshot.fingerprint())
            .collect();
        assert!(fingerprints.len() > 1);
    }

    #[test]
    fn corridors_never_run_under_rooms() {
        for seed in 0..10 {
            let generator = generated(seed, CorridorStrategy::Straight);
            let corridors = generator.corridor_layer();
            for (_, room) in generator.rooms() {
                assert!(corridors.positions().all(|&pos| !room.footprint.contains(pos)));
            }
        }
    }

    #[test]
    fn spawn_counts_match_placed_rooms() {
        let generator = generated(12, CorridorStrategy::Straight);
        let mut counted: BTreeMap<usize, u32> = BTreeMap::new();
        for (_, room) in generator.rooms() {
            *counted.entry(room.template).or_default() += 1;
        }
        for (index, &count) in generator.spawn_counts().iter().enumerate() {
            assert_eq!(counted.get(&index).copied().unwrap_or(0), count);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn corridors_connect_every_room(seed in any::<u64>(), maze in any::<bool>()) {
            let strategy = if maze { CorridorStrategy::Maze } else { CorridorStrategy::Straight };
            let generator = generated(seed, strategy);
            prop_assert!(
                rooms_connected(&generator),
                "seed={seed}, strategy={strategy:?} left rooms disconnected"
            );
        }

        #[test]
        fn layout_stays_inside_bounds(seed in any::<u64>()) {
            let generator = generated(seed, CorridorStrategy::Straight);
            let bounds = generator.bounds().expect("map size is set");
            prop_assert!(generator.corridor_layer().positions().all(|&pos| bounds.contains(pos)));
            prop_assert!(generator.void_layer().positions().all(|&pos| bounds.contains(pos)));
            for (_, room) in generator.rooms() {
                prop_assert!(room.tiles().positions().all(|&pos| bounds.contains(pos)));
            }
        }
    }
}
