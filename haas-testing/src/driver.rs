use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use haas_geofence::{GeoPoint, distance_meters};
use haas_test_shared::{
    CheckReport, evaluate_punches, load_settings, parse_punches, parse_registry, prelude::*,
};
use log::{debug, info};

#[derive(Parser)]
struct Cli {
    /// JSON file with geofence settings, defaults are used if not passed
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the distance in meters between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        long: f64,
        #[arg(allow_negative_numbers = true)]
        other_lat: f64,
        #[arg(allow_negative_numbers = true)]
        other_long: f64,
    },
    /// Check whether a point is within a radius of a center point
    Check {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        long: f64,
        #[arg(allow_negative_numbers = true)]
        center_lat: f64,
        #[arg(allow_negative_numbers = true)]
        center_long: f64,
        /// Radius in meters, defaults to the default radius from settings
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Evaluate a list of punches against a set of venues, printing one JSON line per punch
    Evaluate {
        /// JSON file with `venues` and an `equipment` -> venue mapping
        venues: PathBuf,
        /// JSON file with a list of punches
        punches: PathBuf,
    },
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result {
    colog::init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;
    debug!("Using settings {settings:?}");

    match cli.command {
        Commands::Distance {
            lat,
            long,
            other_lat,
            other_long,
        } => {
            let a = GeoPoint::try_new(lat, long).context("Invalid first point")?;
            let b = GeoPoint::try_new(other_lat, other_long).context("Invalid second point")?;
            println!("{}", distance_meters(a, b));
        }
        Commands::Check {
            lat,
            long,
            center_lat,
            center_long,
            radius,
        } => {
            let point = GeoPoint::try_new(lat, long).context("Invalid point")?;
            let center = GeoPoint::try_new(center_lat, center_long).context("Invalid center")?;
            let radius = radius.unwrap_or(settings.default_radius_meters);
            if !radius.is_finite() || radius < 0.0 {
                bail!("Radius must be a finite non-negative number of meters, got {radius}");
            }
            let report = CheckReport::new(point, center, radius);
            println!("{}", serde_json::to_string(&report)?);
        }
        Commands::Evaluate { venues, punches } => {
            let registry = parse_registry(&read(&venues)?)
                .with_context(|| format!("Failed to load venues from {}", venues.display()))?;
            let punches = parse_punches(&read(&punches)?)
                .with_context(|| format!("Failed to load punches from {}", punches.display()))?;
            info!(
                "Evaluating {} punches against {} venues",
                punches.len(),
                registry.len()
            );
            for line in evaluate_punches(registry, punches, settings)? {
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    Ok(())
}
