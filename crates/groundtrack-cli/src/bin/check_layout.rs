//! Validate an airport layout file and print a summary.
//!
//! Runs the same load-time validation the server does, so layout edits
//! can be checked before deployment.
//!
//! Usage:
//!   cargo run -p groundtrack-cli --bin check_layout -- data/lowg.json

use anyhow::{Context, Result};
use clap::Parser;
use groundtrack_core::AirportLayout;
use std::path::PathBuf;

/// Validate an airport layout JSON file
#[derive(Parser, Debug)]
#[command(author, version, about = "Validate an airport layout file")]
struct Args {
    /// Airport layout JSON
    layout: PathBuf,

    /// Print the full feature list, not just counts
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let layout = AirportLayout::from_file(&args.layout)
        .with_context(|| format!("layout {} failed validation", args.layout.display()))?;

    println!("{} ({})", layout.name, layout.icao);
    println!("  field elevation: {:.0} m", layout.field_elevation_m);
    println!("  runways:         {}", layout.runways.len());
    println!("  taxiways:        {}", layout.taxiways.len());
    println!("  parking:         {}", layout.parking_positions.len());
    println!("  holding points:  {}", layout.holding_points.len());

    if args.verbose {
        for runway in &layout.runways {
            println!(
                "  runway {} ({:.0} m wide, headings {:.0}°/{:.0}°)",
                runway.ident(),
                runway.width_m,
                runway.ends[0].heading_deg,
                runway.ends[1].heading_deg,
            );
        }
        for taxiway in &layout.taxiways {
            println!(
                "  taxiway {} ({} centerline points)",
                taxiway.ident,
                taxiway.centerline.len()
            );
        }
        for parking in &layout.parking_positions {
            println!("  parking {}", parking.ident);
        }
        for hp in &layout.holding_points {
            println!(
                "  holding point {} (taxiway {}, runway {})",
                hp.ident, hp.taxiway_ident, hp.runway_ident
            );
        }
    }

    println!("layout OK");
    Ok(())
}
