use anyhow::Context;
use clap::Parser;
use geocoin_core::{Engine, GameConfig};
use std::path::{Path, PathBuf};

mod file_storage;
mod repl;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file overriding the gameplay parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the game is saved between sessions
    #[arg(short, long, default_value = "geocoin-save.json")]
    save: PathBuf,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Could not parse config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let config = load_config(args.config.as_deref())?;
    log::debug!("config: {:?}", config);
    let storage = file_storage::FileStorage::open(&args.save)?;
    let mut engine = Engine::new(config, storage).context("Invalid game configuration")?;

    log::info!("Game started at {}", engine.position());
    let stdin = std::io::stdin();
    repl::run(&mut engine, stdin.lock(), std::io::stdout().lock())
}
