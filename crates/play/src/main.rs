//! Play CLI
//!
//! Human vs the distributed engine, or a one-off analysis of a position.

mod game;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::{move_to_uci, Color, Engine, Position};
use clap::{Args, Parser, Subcommand};
use distributed_engine::{Cluster, DistributedEngine, SearchConfig, WorkerGroup};
use tracing::info;
use tracing_subscriber::EnvFilter;

use game::{Console, GameSetup};

#[derive(Parser)]
#[command(name = "play")]
#[command(about = "Play chess against a distributed alpha-beta search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Take the white pieces
    #[arg(long, conflicts_with = "black")]
    white: bool,

    /// Take the black pieces (the computer then opens)
    #[arg(long)]
    black: bool,

    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Search one position and print the best move
    Analyse {
        /// Position to analyse (defaults to the start position)
        #[arg(long)]
        fen: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Number of workers searching together
    #[arg(short, long)]
    workers: Option<usize>,

    /// Deepest iteration, in plies
    #[arg(short, long)]
    depth: Option<u8>,

    /// Time budget per move, in seconds
    #[arg(short, long)]
    time: Option<u64>,

    /// TOML file with default search settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SearchArgs {
    /// File settings first, then flags on top.
    fn resolve(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SearchConfig::default(),
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(secs) = self.time {
            config.move_time_secs = secs;
        }
        config.validate().context("invalid search settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Analyse { fen, search }) => analyse(fen.as_deref(), &search),
        None => {
            let human = if cli.black && !cli.white {
                Color::Black
            } else {
                Color::White
            };
            play_game(human, &cli.search)
        }
    }
}

fn play_game(human: Color, args: &SearchArgs) -> Result<()> {
    let config = args.resolve()?;
    let setup = GameSetup {
        start: Position::startpos(),
        human,
        limits: config.limits(),
    };
    info!(
        workers = config.workers,
        max_depth = config.max_depth,
        move_time_secs = config.move_time_secs,
        "starting game"
    );

    println!("Enter moves in coordinate notation (e2e4, e7e8q), or 'quit'.");
    Cluster::run(config.workers, |world| {
        if world.rank() == 0 {
            let mut console = Console::new(io::stdin().lock(), io::stdout());
            game::play(&world, &setup, Some(&mut console))
        } else {
            game::play::<_, io::StdinLock<'static>, io::Stdout>(&world, &setup, None)
        }
    })
    .context("game aborted")?;
    Ok(())
}

fn analyse(fen: Option<&str>, args: &SearchArgs) -> Result<()> {
    let config = args.resolve()?;
    let pos = match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("bad FEN: {fen}"))?,
        None => Position::startpos(),
    };
    let limits = config.limits();

    println!("{pos}\n");
    let mut engine = DistributedEngine::from_config(&config);
    let result = engine.search(&pos, limits).context("search failed")?;

    match result.best_move {
        Some(mv) => println!("Best move: {}", move_to_uci(mv)),
        None => println!("No legal moves."),
    }
    println!(
        "Score: {:+.2}  Depth: {}  Nodes: {}{}",
        result.score / 100.0,
        result.depth,
        result.nodes,
        if result.stopped { "  (time limit)" } else { "" }
    );
    Ok(())
}
