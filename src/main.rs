use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use mapgesture::config::Config;
use mapgesture::input::InputSettings;
use mapgesture::replay::ReplayScript;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MAPGESTURE_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "mapgesture")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Classify raw map input into clicks, double clicks and drags"
)]
struct Cli {
    /// Replay a TOML script of raw input steps and print the classified events
    #[arg(long, short = 'r', value_name = "SCRIPT")]
    replay: Option<PathBuf>,

    /// Print replayed events as JSON lines
    #[arg(long, action = ArgAction::SetTrue, requires = "replay")]
    json: bool,

    /// Configuration file (defaults to ~/.config/mapgesture/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let Some(script_path) = cli.replay else {
        println!("mapgesture: Classify raw map input into clicks, double clicks and drags");
        println!();
        println!("Usage:");
        println!("  mapgesture --replay <SCRIPT>          Replay a raw input script");
        println!("  mapgesture --replay <SCRIPT> --json   Emit one JSON object per event");
        println!("  mapgesture --help                     Show help");
        println!();
        println!("Script format:");
        println!("  [[steps]]");
        println!("  at_ms = 0");
        println!("  action = \"down\"   # down | up | move | key-down | key-up");
        println!("  x = 1.0");
        println!("  y = 1.0");
        println!("  button = \"left\"   # left | middle | right");
        println!("  key = \"shift\"     # shift | alt | ctrl (key steps only)");
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = InputSettings::from(&config.input);

    let script = ReplayScript::load(&script_path)
        .with_context(|| format!("Failed to load {}", script_path.display()))?;
    log::info!(
        "Replaying {} steps from {}",
        script.steps.len(),
        script_path.display()
    );

    let events = script
        .run(settings, &tokio::runtime::Handle::current())
        .await?;

    for replayed in &events {
        if cli.json {
            println!("{}", serde_json::to_string(replayed)?);
        } else {
            let event = &replayed.event;
            println!(
                "{:>6} ms  {:<9} {:<6} {:<5} {}",
                replayed.at_ms,
                event.kind.to_string(),
                event.pointer.to_string(),
                event.key.to_string(),
                event.window_position
            );
        }
    }

    Ok(())
}
