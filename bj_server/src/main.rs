//! Multi-player blackjack server.
//!
//! Everyone who connects sits at one shared table and plays against the
//! house dealer over a plain line-based TCP protocol.

mod config;

use anyhow::Error;
use ctrlc::set_handler;
use log::{info, warn};
use pico_args::Arguments;

use blackjack::server;
use config::{Overrides, ServerConfig};

const HELP: &str = "\
Run a multi-player blackjack server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address      [default: env SERVER_BIND or 0.0.0.0:6000]
  --chips         N        Chips each player starts with    [default: env STARTING_CHIPS or 200]
  --decks         N        Decks combined into the shoe     [default: env NUM_DECKS or 8]
  --stand-on      N        Dealer stops drawing at this     [default: env DEALER_STANDS_ON or 17]
  --min-players   N        Players needed to start a round  [default: env MIN_PLAYERS or 2]
  --reshuffle-at  N        Rebuild the shoe below N cards   [default: env RESHUFFLE_THRESHOLD or 52]
  --table-config  FILE     JSON table settings, overridden by the options above

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log level (e.g., debug)  [default: info]
  (A .env file in the working directory is read on start-up)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        bind: pargs.opt_value_from_str("--bind")?,
        starting_chips: pargs.opt_value_from_str("--chips")?,
        num_decks: pargs.opt_value_from_str("--decks")?,
        dealer_stands_on: pargs.opt_value_from_str("--stand-on")?,
        min_players: pargs.opt_value_from_str("--min-players")?,
        reshuffle_threshold: pargs.opt_value_from_str("--reshuffle-at")?,
        table_config: pargs.opt_value_from_str("--table-config")?,
    };
    let unused = pargs.finish();

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
    if !unused.is_empty() {
        warn!("ignoring unrecognized arguments: {unused:?}");
    }

    let config = ServerConfig::from_env(overrides)?;
    info!("starting blackjack server at {}", config.bind);
    info!(
        "{} chips per player, {} deck(s), dealer stands on {}, {} player(s) to start, reshuffle below {} cards",
        config.table.starting_chips,
        config.table.num_decks,
        config.table.dealer_stands_on,
        config.table.min_players,
        config.table.reshuffle_threshold
    );

    server::run(config.bind, config.table).await?;
    Ok(())
}
