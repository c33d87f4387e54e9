mod discover;


use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "wwtp-cli")]
#[command(about = "Find wastewater treatment plants and verify them from satellite imagery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around a point and verify every candidate against imagery
    Discover {
        /// Latitude of the search centre, in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search centre, in degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in kilometres
        #[arg(long, default_value_t = 300.0)]
        radius_km: f64,
        /// Directory the CSV tables and map are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Candidates verified concurrently (overrides `WWTP_MAX_IN_FLIGHT`)
        #[arg(long)]
        max_in_flight: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Discover {
            lat,
            lng,
            radius_km,
            output_dir,
            max_in_flight,
        }) => {
            discover::run_discover(discover::DiscoverArgs {
                lat,
                lng,
                radius_km,
                output_dir,
                max_in_flight,
            })
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
