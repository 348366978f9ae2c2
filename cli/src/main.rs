use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use gemswap_core::{BoardConfig, CascadeMode, Grid, PlayEngine};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod play;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Swap neighboring gems to line up three of a kind", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// TOML file with board settings, flags given here take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a hand-made board instead of a random one
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u8>,

    #[arg(long)]
    height: Option<u8>,

    /// Number of distinct symbols, at least 3
    #[arg(long)]
    symbols: Option<u8>,

    /// Move budget
    #[arg(long)]
    moves: Option<u32>,

    #[arg(long, value_enum)]
    cascade: Option<CascadeArg>,

    /// Replay falling and spawning tiles step by step
    #[arg(short, long)]
    animate: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CascadeArg {
    Single,
    Full,
}

impl From<CascadeArg> for CascadeMode {
    fn from(arg: CascadeArg) -> Self {
        match arg {
            CascadeArg::Single => CascadeMode::Single,
            CascadeArg::Full => CascadeMode::Full,
        }
    }
}

/// Layout of the `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    seed: Option<u64>,
    animate: bool,
    #[serde(flatten)]
    board: BoardConfig,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}

impl Args {
    fn settings(&self) -> Result<ConfigFile> {
        let mut settings = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let board = &mut settings.board;
        if let Some(width) = self.width {
            board.size.0 = width;
        }
        if let Some(height) = self.height {
            board.size.1 = height;
        }
        if let Some(symbols) = self.symbols {
            board.symbols = symbols;
        }
        if let Some(moves) = self.moves {
            board.moves = moves;
        }
        if let Some(cascade) = self.cascade {
            board.cascade = cascade.into();
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings.animate |= self.animate;
        Ok(settings)
    }
}

fn load_board(path: &Path) -> Result<Grid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read board {}", path.display()))?;
    text.parse()
        .with_context(|| format!("Invalid board {}", path.display()))
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut settings = args.settings()?;
    let seed = settings.seed.unwrap_or_else(random_seed);
    log::debug!("seed: {}", seed);

    let engine = match &args.board {
        Some(path) => {
            let grid = load_board(path)?;
            settings.board.size = grid.size();
            PlayEngine::with_generator(settings.board, seed, grid)
        }
        None => PlayEngine::new(settings.board, seed),
    }
    .context("Could not set up the board")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play::run(engine, stdin.lock(), stdout.lock(), settings.animate)
}
