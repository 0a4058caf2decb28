#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident map CLI.
//!
//! ```text
//! incident_map [--config map.toml] [--no-seed]
//! incident_map show [--type Theft] [--date 2023-07-15] [--geojson out.geojson]
//! ```
//!
//! Running with no subcommand enters interactive mode. Reported incidents
//! live only as long as the process.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use incident_map_app::{App, AppOptions, export_geojson, format_frame};

#[derive(Parser)]
#[command(
    name = "incident_map",
    about = "Report incidents and view them as map markers"
)]
struct Cli {
    /// Map config TOML file replacing the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start without the built-in sample incidents
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the map once and exit
    Show {
        /// Only show incidents of this crime type
        #[arg(long = "type")]
        crime_type: Option<String>,
        /// Only show incidents on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Also write the visible incidents to this GeoJSON file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut app = App::from_options(&AppOptions {
        config_path: cli.config,
        no_seed: cli.no_seed,
    })?;

    let Some(command) = cli.command else {
        incident_map_app::interactive::run(&mut app)?;
        return Ok(());
    };

    match command {
        Commands::Show {
            crime_type,
            date,
            geojson,
        } => {
            if let Some(crime_type) = crime_type {
                app.change_type_filter(&crime_type)?;
            }
            if let Some(date) = date {
                app.change_date_filter(&date)?;
            }

            let frame = app.render();
            print!("{}", format_frame(&frame, app.store().len()));

            if let Some(path) = geojson {
                export_geojson(&frame, &path)?;
            }
        }
    }

    Ok(())
}
