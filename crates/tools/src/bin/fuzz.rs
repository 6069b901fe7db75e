use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::mapgen::{MAX_PLACEMENT_FAILURES, PlacementStop};
use dungeon_core::{CorridorStrategy, DungeonGenerator, RoomTemplate, TileId, TilePalette};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::seed::format_fingerprint;

const PALETTE: TilePalette = TilePalette { corridor: TileId(100), door: TileId(101) };
const WALL: TileId = TileId(1);
const FLOOR: TileId = TileId(2);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn between(rng: &mut ChaCha8Rng, low: i32, high: i32) -> i32 {
    low + (rng.next_u64() % (high - low + 1) as u64) as i32
}

fn random_templates(rng: &mut ChaCha8Rng) -> Vec<RoomTemplate> {
    let count = between(rng, 1, 5);
    (0..count)
        .map(|index| {
            let width = between(rng, 3, 12);
            let height = between(rng, 3, 12);
            RoomTemplate::rectangular(format!("room{index}"), width, height, WALL, FLOOR)
                .with_spawn_limit(between(rng, 0, 6) as u32)
                .with_rotation(rng.next_u64() % 2 == 0)
        })
        .collect()
}

fn run_case(run: u32, rng: &mut ChaCha8Rng) -> Result<u64> {
    let map_seed = rng.next_u64();
    let width = between(rng, 12, 120);
    let height = between(rng, 12, 90);
    let spacing = between(rng, 0, 4);
    let target = between(rng, 0, 20) as usize;
    let strategy =
        if rng.next_u64() % 2 == 0 { CorridorStrategy::Straight } else { CorridorStrategy::Maze };
    let templates = random_templates(rng);

    let mut generator = DungeonGenerator::new(run, map_seed, PALETTE);
    generator.set_corridor_strategy(strategy);
    generator.set_map_size(width, height)?;
    generator.create_void_tiles(&[TileId(0), TileId(3)])?;
    let placement = generator.generate_rooms(&templates, target, spacing)?;
    let corridors = generator.generate_corridors()?;
    generator.resolve_doors();

    let Some(snapshot) = generator.snapshot() else {
        bail!("Invariant failed: no snapshot after generation (map_seed {map_seed})");
    };
    let bounds = snapshot.bounds;

    if snapshot.void_layer.len() != bounds.cell_count() {
        bail!("Invariant failed: void layer does not cover the map (map_seed {map_seed})");
    }
    if snapshot.rooms.len() > target {
        bail!("Invariant failed: placed more rooms than requested (map_seed {map_seed})");
    }
    let budget_stop = placement.stop == PlacementStop::FailureBudget;
    if budget_stop && placement.failures != MAX_PLACEMENT_FAILURES {
        bail!("Invariant failed: failure budget stop with wrong count (map_seed {map_seed})");
    }
    for (template, &count) in templates.iter().zip(&placement.spawn_counts) {
        if count > template.spawn_limit {
            bail!("Invariant failed: '{}' exceeded its spawn limit", template.name);
        }
    }
    let gap = spacing.max(1);
    for (index, room) in snapshot.rooms.iter().enumerate() {
        if !room.tiles().positions().all(|&pos| bounds.contains(pos)) {
            bail!("Invariant failed: '{}' leaves the map (map_seed {map_seed})", room.name);
        }
        for other in &snapshot.rooms[index + 1..] {
            if room.footprint.expanded(gap).intersects(&other.footprint) {
                bail!("Invariant failed: rooms closer than {gap} (map_seed {map_seed})");
            }
        }
        if snapshot.corridor_layer.positions().any(|&pos| room.footprint.contains(pos)) {
            bail!("Invariant failed: corridor under '{}' (map_seed {map_seed})", room.name);
        }
    }
    let disconnected = snapshot.disconnected_rooms();
    if !disconnected.is_empty() || !corridors.is_complete() {
        bail!("Invariant failed: rooms {disconnected:?} unreachable (map_seed {map_seed})");
    }

    Ok(snapshot.fingerprint())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut combined = 0_u64;
    for run in 0..args.runs {
        let fingerprint = run_case(run, &mut rng)?;
        combined = combined.rotate_left(5) ^ fingerprint;
    }

    println!("Fuzzing completed successfully.");
    println!("Combined fingerprint: {}", format_fingerprint(combined));
    Ok(())
}
