//! Entry point for **gridwarp**.
//!
//! Loads the configuration, applies command-line overrides and runs one
//! overlay session.  Exits with status 1 on any fatal error.

use gridwarp::config::Config;
use log::{error, info, warn};
use std::path::PathBuf;

const USAGE: &str = "usage: gridwarp [--output NAME]";

/// Resolve the config directory (`$XDG_CONFIG_HOME/gridwarp`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("gridwarp")
}

/// Try to load the config from `$XDG_CONFIG_HOME/gridwarp/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Config::default();
    }
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Command-line options.
#[derive(Debug, Default)]
struct Args {
    output: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" | "-o" => match args.next() {
                Some(name) => parsed.output = Some(name),
                None => return Err(format!("{} needs an output name", arg)),
            },
            _ => match arg.strip_prefix("--output=") {
                Some(name) => parsed.output = Some(name.to_string()),
                None => return Err(format!("unknown argument {:?}", arg)),
            },
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::init();

    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let mut config = load_config();
    if args.output.is_some() {
        config.output = args.output;
    }

    if let Err(e) = gridwarp::wayland::run(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
