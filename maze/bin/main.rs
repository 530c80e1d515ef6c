use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use maze::{GridMap, LoadError, MazeConfig, MazeSolver, SolutionReport};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Find a way from the entrance ('e') to the dragon ('d') of a maze file
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Maze file: a `rows cols` header followed by the rows of the maze
    input: PathBuf,

    /// JSON file with marker glyphs and search limits
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Give up after this many search steps
    #[arg(long)]
    max_steps: Option<u64>,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MazeConfig::load(path)?,
        None => MazeConfig::default(),
    };
    if args.max_steps.is_some() {
        config.max_steps = args.max_steps;
    }

    let text = args.format == Format::Text;

    if text {
        println!("Welcome, brave knight!");
        println!("Reading the map of {:?} ...", args.input);
    }

    let map = GridMap::load(&args.input)?;
    let entrance = map
        .locate_entrance()
        .ok_or(LoadError::NoEntrance)
        .with_context(|| format!("cannot solve {:?}", args.input))?;

    if text {
        println!("Searching for the dragon, this may take a while ...");
    }

    let solver = MazeSolver::new(entrance);
    let outcome = match config.max_steps {
        Some(limit) => solver.finish_within(&map, limit)?,
        None => solver.finish(&map),
    };
    log::info!(
        "search finished in {} steps ({} commits, {} retractions)",
        outcome.stats.steps,
        outcome.stats.commits,
        outcome.stats.retractions
    );

    let report = SolutionReport::new(&map, &outcome, &config.markers);

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text if outcome.is_solved() => {
            println!("Here is the way: {}", report.directions);
            println!("And here it is on the map:");
            for row in &report.grid {
                println!("{}", row);
            }
        }
        Format::Text => {
            println!("There is no way to the dragon, it will have to wait for another day.");
        }
    }

    Ok(())
}
