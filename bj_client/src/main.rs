//! A line-based blackjack client.
//!
//! Prints whatever the server says and sends each line typed on stdin
//! back as the answer to the current prompt.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use pico_args::Arguments;
use std::{
    io::{self, BufRead, Write},
    net::SocketAddr,
    thread,
};

use blackjack::Client;

const HELP: &str = "\
Connect to a blackjack server

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --connect IP:PORT     Server socket address  [default: 127.0.0.1:6000]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    addr: SocketAddr,
}

fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        addr: pargs
            .opt_value_from_str("--connect")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 6000))),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    run(args)
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.addr)?;
    // The table can stay quiet for a long time between rounds.
    client.set_read_timeout(None)?;
    let mut writer = client
        .stream
        .try_clone()
        .context("couldn't clone the server connection")?;

    thread::spawn(move || {
        loop {
            match client.recv_line() {
                Ok(Some(line)) => println!("{line}"),
                Ok(None) => {
                    println!("server closed the connection");
                    break;
                }
                Err(error) => {
                    eprintln!("lost connection to the server: {error}");
                    break;
                }
            }
        }
        std::process::exit(0);
    });

    for line in io::stdin().lock().lines() {
        let line = line?;
        writeln!(writer, "{}", line.trim()).context("couldn't send to the server")?;
    }
    Ok(())
}
