//! digikey-kicad-gen: KiCad library generation from Digi-Key search results
//!
//! Fetches a component family from the Digi-Key API, keeps the cheapest part per
//! value and writes footprints plus a symbol library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use digikey_kicad_gen::artifact::Templates;
use digikey_kicad_gen::component::ComponentKind;
use digikey_kicad_gen::config::{self, Config};
use digikey_kicad_gen::digikey::{ClientCredentials, DigikeyClient};
use digikey_kicad_gen::generate::{self, Job};

/// Generate KiCad footprints and symbols from Digi-Key search results.
///
/// Keeps the cheapest part for every distinct value. Credentials are read from the
/// environment (`DIGIKEY_CLIENT_ID`, `DIGIKEY_CLIENT_SECRET` by default).
#[derive(Parser, Debug)]
#[command(name = "digikey-kicad-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Type of component: resistor, capacitor-radial (or capTHRad), diode
    #[arg(long, value_name = "TYPE")]
    component: ComponentKind,

    /// Power rating filter for resistors (e.g. 0.25W, 1/4W)
    #[arg(long)]
    power: Option<String>,

    /// Voltage rating filter for capacitors (e.g. 6.3v, 10v)
    #[arg(long)]
    voltage: Option<String>,

    /// Records requested per search page
    #[arg(long)]
    limit: Option<u32>,

    /// Folder for generated footprints
    #[arg(long = "foot-folder", value_name = "DIR")]
    foot_folder: Option<PathBuf>,

    /// Filename of the symbol library
    #[arg(long, value_name = "FILE")]
    sym: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Builds the job from configuration, with command-line values taking precedence.
    fn job(&self, cfg: &Config) -> Job {
        let mut job = Job::from_config(self.component, cfg);
        let rating = match self.component {
            ComponentKind::CapacitorRadial => self.voltage.as_ref(),
            ComponentKind::Resistor | ComponentKind::Diode => self.power.as_ref(),
        };
        if let Some(rating) = rating {
            job.rating.clone_from(rating);
        }
        if let Some(limit) = self.limit {
            job.page_size = limit;
        }
        if let Some(dir) = &self.foot_folder {
            job.footprint_dir.clone_from(dir);
        }
        if let Some(sym) = &self.sym {
            job.symbol_library.clone_from(sym);
        }
        job
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "info" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO, // Default to info for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for digikey-kicad-gen.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("See config/example-config.json for the expected format");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "digikey-kicad-gen {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();

    let job = args.job(&cfg);
    info!(
        component = %job.kind,
        rating = %job.rating,
        footprints = %job.footprint_dir.display(),
        library = %job.symbol_library.display(),
        "Starting generation"
    );

    let client = match ClientCredentials::from_env(&cfg.api)
        .and_then(|credentials| DigikeyClient::new(&cfg.api, credentials))
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Cannot create API client");
            return ExitCode::FAILURE;
        }
    };

    let templates = Templates::new();

    match generate::run(&client, &job, &templates) {
        Ok(summary) => {
            info!(
                fetched = summary.fetched,
                selected = summary.selected,
                footprints = summary.footprints_written,
                symbols = summary.symbols_written,
                library_failed = summary.library_failed,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let cause = std::error::Error::source(&e).map(ToString::to_string);
            error!(error = %e, cause = ?cause, "Generation failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn command_line_overrides_config() {
        let args = Args::parse_from([
            "digikey-kicad-gen",
            "--component",
            "capTHRad",
            "--voltage",
            "16v",
            "--power",
            "1/8W",
            "--limit",
            "20",
            "--foot-folder",
            "out",
            "--sym",
            "caps.kicad_sym",
        ]);
        let job = args.job(&Config::default());
        assert_eq!(job.kind, ComponentKind::CapacitorRadial);
        assert_eq!(job.rating, "16v");
        assert_eq!(job.page_size, 20);
        assert_eq!(job.footprint_dir, PathBuf::from("out"));
        assert_eq!(job.symbol_library, PathBuf::from("caps.kicad_sym"));
        assert_eq!(job.footprint_nickname, "DigikeyCapacitors");
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let args = Args::parse_from(["digikey-kicad-gen", "--component", "resistor"]);
        let job = args.job(&Config::default());
        assert_eq!(job.rating, "0.25W");
        assert_eq!(job.page_size, 50);
        assert_eq!(job.symbol_library, PathBuf::from("symbolLibrary.kicad_sym"));
    }

    #[test]
    fn log_level_selection() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::INFO);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
    }

    #[test]
    fn unknown_component_is_rejected() {
        assert!(Args::try_parse_from(["digikey-kicad-gen", "--component", "inductor"]).is_err());
    }
}
