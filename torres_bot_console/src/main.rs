#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod network;

use std::time::Duration;

use clap::{Command, arg};
use log::info;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Torres turn bot")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Joins a Torres game server and ends its turn whenever it gets one")
        .arg(
            arg!([server_address] "WebSocket address of the game server")
                .default_value(client_main::DEFAULT_SERVER_ADDRESS),
        )
        .arg(
            arg!(--"tick-interval" <duration> "How often to check whether it's our turn")
                .value_parser(humantime::parse_duration)
                .default_value("1s"),
        )
        .arg(arg!(--"join" "Ask the server for a player seat after connecting"))
        .get_matches();

    ctrlc::set_handler(|| {
        info!("Interrupted");
        std::process::exit(0)
    })?;

    client_main::run(client_main::ClientConfig {
        server_address: matches.get_one::<String>("server_address").unwrap().clone(),
        tick_interval: *matches.get_one::<Duration>("tick-interval").unwrap(),
        join_game: matches.get_flag("join"),
    })
}
