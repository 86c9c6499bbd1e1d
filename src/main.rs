//! Command line front end for the magpie position and move core.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{WriteLogger, LevelFilter};
use magpie::chess::{Position, RookMagics};
use magpie::chess::error::{MagicError, ParseFenError};
use magpie::config::{Config, ConfigError};

fn main() -> Result<(), Error> {
    let matches = app().get_matches();

    let mut config = Config::find(matches.value_of_os("config").map(Path::new))?;
    override_config(&mut config, &matches);

    let log_level = config.log.level_filter()?;
    let _logger = if config.log.enabled {
        let log_file = &config.log.file;
        WriteLogger::init(
            log_level,
            simplelog::Config::default(),
            File::create(log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, simplelog::Config::default(), std::io::sink())
    };

    match matches.subcommand() {
        ("magics", Some(matches)) => print_magics(matches, &config),
        ("moves", Some(matches)) => print_moves(matches, &config),
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        },
    }
}

fn app() -> App<'static, 'static> {
    App::new("Magpie")
        .version(crate_version!())
        .author("Mike Leany")
        .arg(Arg::with_name("config")
            .long("config")
            .short("c")
            .global(true)
            .value_name("FILE")
            .takes_value(true)
            .help("Reads settings from FILE instead of ~/.magpie/config.yaml"))
        .arg(Arg::with_name("log")
            .long("log")
            .short("l")
            .global(true)
            .help("Turns on logging"))
        .arg(Arg::with_name("log-file")
            .long("log-file")
            .global(true)
            .value_name("LOG_FILE")
            .takes_value(true)
            .help("Sets the log file if logging is turned on [default: magpie.log]"))
        .arg(Arg::with_name("log-level")
            .long("log-level")
            .global(true)
            .value_name("LEVEL")
            .takes_value(true)
            .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
            .help("Sets the log level if logging is turned on [default: info]"))
        .subcommand(SubCommand::with_name("magics")
            .about("Searches for rook magic numbers and prints one per square")
            .arg(Arg::with_name("seed")
                .long("seed")
                .short("s")
                .value_name("SEED")
                .takes_value(true)
                .help("Seeds the random number generator for reproducible magics")))
        .subcommand(SubCommand::with_name("moves")
            .about("Applies moves to a position, then lists the pawn and rook moves \
                    available to the\nside to move")
            .arg(Arg::with_name("fen")
                .long("fen")
                .short("f")
                .value_name("FEN_STRING")
                .takes_value(true)
                .help("Starting position in Forsyth-Edwards Notation (FEN). Defaults to the \
                       standard\nstarting position."))
            .arg(Arg::with_name("moves")
                .value_name("MOVE")
                .multiple(true)
                .help("Moves to apply, in coordinate notation such as e2e4 or a7a8q")))
}

/// Command line flags take precedence over the configuration file
fn override_config(config: &mut Config, matches: &ArgMatches) {
    if matches.is_present("log") {
        config.log.enabled = true;
    }
    if let Some(file) = matches.value_of_os("log-file") {
        config.log.file = PathBuf::from(file);
    }
    if let Some(level) = matches.value_of("log-level") {
        config.log.level = level.to_owned();
    }
}

/// Builds the rook tables as configured, with the seed from the command line taking precedence
fn build_magics(seed: Option<u64>, config: &Config) -> Result<RookMagics, Error> {
    let seed = seed.or(config.magic.seed).unwrap_or_else(rand::random);
    info!("building rook magics with seed {}", seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let magics = RookMagics::build_with(&mut rng, config.magic.max_attempts, |sq, entry| {
        println!("{}  {:2}  {:#018x}", sq, entry.bits(), entry.magic());
    })?;

    Ok(magics)
}

fn print_magics(matches: &ArgMatches, config: &Config) -> Result<(), Error> {
    let seed = match matches.value_of("seed") {
        Some(s) => Some(s.parse().map_err(|_| Error(format!("{}: seed must be numeric", s)))?),
        None => None,
    };

    build_magics(seed, config)?;
    Ok(())
}

fn print_moves(matches: &ArgMatches, config: &Config) -> Result<(), Error> {
    let mut pos = match matches.value_of("fen") {
        Some(fen) => fen.parse().map_err(|err: ParseFenError| Error(format!("{}: {}", fen, err)))?,
        None => Position::new(),
    };

    for token in matches.values_of("moves").into_iter().flatten() {
        pos.apply_move_str(token).map_err(|err| Error(format!("{}: {}", token, err)))?;
    }

    let magics = build_magics_quietly(config)?;
    println!("{}", pos);
    for mv in pos.pseudo_legal_moves(&magics) {
        println!("{}", mv);
    }

    Ok(())
}

fn build_magics_quietly(config: &Config) -> Result<RookMagics, Error> {
    let seed = config.magic.seed.unwrap_or_else(rand::random);
    Ok(RookMagics::build_seeded(seed, config.magic.max_attempts)?)
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error(err.to_string())
    }
}

impl From<MagicError> for Error {
    fn from(err: MagicError) -> Self {
        Error(err.to_string())
    }
}
