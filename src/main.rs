//! Point Salad - Main Binary
//!
//! Host a match, join one as a human player, or run a bot tournament

use anyhow::Context;
use clap::{Parser, Subcommand};
use point_salad::{
    client::run_client,
    config::{BotConfig, MatchConfig, DEFAULT_MAX_ATTEMPTS},
    game::{GameLoop, GameOutcome, Match, VerbosityLevel},
    loader::Manifest,
    network::accept_players,
    tournament::run_tourney,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "salad")]
#[command(about = "Point Salad - card drafting for 2 to 6 players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a match and wait for the human players to connect
    Host {
        /// Number of human players
        #[arg(long, default_value_t = 1)]
        players: usize,

        /// Number of bots
        #[arg(long, default_value_t = 1)]
        bots: usize,

        /// TCP port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Card manifest (.json); the bundled manifest is used if omitted
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Set random seed for deterministic testing
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling attempts before a bot falls back to exhaustive search
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },

    /// Join a hosted match as a human player
    Join {
        /// Host name or address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Host TCP port
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Run many bot matches in parallel and print statistics
    Tourney {
        /// Actors per match
        #[arg(long, default_value_t = 2)]
        actors: usize,

        /// Number of matches
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// Tournament seed; each match derives its own
        #[arg(long)]
        seed: Option<u64>,

        /// Card manifest (.json); the bundled manifest is used if omitted
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Sampling attempts before a bot falls back to exhaustive search
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Host {
            players,
            bots,
            port,
            manifest,
            seed,
            max_attempts,
            verbosity,
        } => {
            run_host(
                players,
                bots,
                port,
                manifest,
                seed,
                max_attempts,
                verbosity.into(),
            )
            .await?
        }
        Commands::Join { host, port } => run_client(&host, port)
            .await
            .with_context(|| format!("playing on {host}:{port}"))?,
        Commands::Tourney {
            actors,
            games,
            seed,
            manifest,
            max_attempts,
        } => {
            let manifest = load_manifest(manifest.as_deref())?;
            let seed = seed.unwrap_or_else(rand::random);
            let bot = BotConfig { max_attempts };
            let report = tokio::task::spawn_blocking(move || {
                run_tourney(&manifest, actors, games, &bot, seed)
            })
            .await??;
            println!("{report}");
        }
    }

    Ok(())
}

fn load_manifest(path: Option<&Path>) -> anyhow::Result<Manifest> {
    match path {
        Some(path) => Manifest::load_from_file(path)
            .with_context(|| format!("loading manifest {}", path.display())),
        None => Ok(Manifest::builtin()?),
    }
}

async fn run_host(
    players: usize,
    bots: usize,
    port: u16,
    manifest: Option<PathBuf>,
    seed: Option<u64>,
    max_attempts: usize,
    verbosity: VerbosityLevel,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let config = MatchConfig::new(players, bots)
        .with_seed(seed)
        .with_max_attempts(max_attempts)
        .with_verbosity(verbosity);
    config.validate()?;
    let manifest = load_manifest(manifest.as_deref())?;

    println!("=== Point Salad - Host ===");
    println!("Players: {players}, bots: {bots}, seed: {seed}\n");

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    let channels = accept_players(&listener, players).await?;

    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let game = Match::new(&config, &manifest, &mut rng)?;
    let outcome = GameLoop::new(game, channels, &config.bot, &mut rng)?
        .run()
        .await?;

    match outcome {
        GameOutcome::Completed(ranking) => print!("{ranking}"),
        GameOutcome::Aborted { by } => println!("Player {by} left, match aborted"),
    }
    Ok(())
}
