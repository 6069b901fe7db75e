use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dungeon_core::{CorridorStrategy, generate_dungeon};
use tools::ascii::render_ascii;
use tools::config_file::load_config;
use tools::seed::{format_fingerprint, generate_runtime_seed, resolve_seed};
use tools::logger;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Straight,
    Maze,
}

impl From<StrategyArg> for CorridorStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Straight => Self::Straight,
            StrategyArg::Maze => Self::Maze,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dungeon config TOML file
    #[arg(short, long)]
    config: PathBuf,
    /// Overrides the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long, requires = "height")]
    width: Option<i32>,
    #[arg(long, requires = "width")]
    height: Option<i32>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Print the finished layout as JSON instead of an ASCII preview
    #[arg(long)]
    json: bool,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose).context("Failed to install logger")?;

    let mut config = load_config(&args.config)?;
    let seed = resolve_seed(args.seed, config.seed, generate_runtime_seed());
    config.seed = seed.value();
    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.width = width;
        config.height = height;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }

    let dungeon = generate_dungeon(&config).context("Dungeon generation failed")?;

    if args.json {
        println!("{}", dungeon.to_json().context("Failed to serialize dungeon JSON")?);
        return Ok(());
    }

    print!("{}", render_ascii(&dungeon, config.palette.door));
    println!("Seed: {} ({})", seed.value(), seed.source());
    println!("Size: {}x{}", dungeon.bounds.width(), dungeon.bounds.height());
    println!("Rooms: {} (target {})", dungeon.rooms.len(), config.target_rooms);
    println!("Corridor tiles: {}", dungeon.corridor_layer.len());
    println!("Fingerprint: {}", format_fingerprint(dungeon.fingerprint()));

    Ok(())
}
