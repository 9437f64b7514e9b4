use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_viewer_data_management::{
    export::{google_maps_link, stats_csv},
    gpx_util::export_gpx,
    DataManager,
};
use relay_viewer_lib::{feature_collection::tracks_to_feature_collection, stats::global_stats};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "RelayCLI")]
#[command(about = "A CLI to inspect and export relay tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the relay directories
    Dirs,
    /// Print global and per segment statistics of a directory
    Stats { directory: String },
    /// Write the per segment statistics as CSV (stdout when no file is given)
    ExportCsv {
        directory: String,
        output: Option<PathBuf>,
    },
    /// Write one segment as a GPX file
    ExportGpx {
        directory: String,
        segment: u32,
        output: Option<PathBuf>,
    },
    /// Print the tracks of a directory as GeoJSON
    Geojson { directory: String },
    /// Print a Google Maps link for a segment
    MapsLink { directory: String, segment: u32 },
    /// Delete the disk cache
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let data_manager = DataManager::start().await?;

    match cli.command {
        Commands::Dirs => {
            for dir in data_manager.directories()? {
                println!("{}\t{}", dir.name, dir.display_name);
            }
        }
        Commands::Stats { directory } => {
            let tracks = data_manager.load_tracks(&directory).await?;
            let stats = global_stats(&tracks);
            println!("Segments:         {}", stats.total_segments);
            println!("Total distance:   {:.2} km", stats.total_distance_km);
            println!("Average distance: {:.2} km", stats.average_distance_km);
            println!("Total points:     {}", stats.total_points);
            println!("Longest segment:  {:.2} km", stats.max_distance_km);
            println!("Shortest segment: {:.2} km", stats.min_distance_km);
        }
        Commands::ExportCsv { directory, output } => {
            let tracks = data_manager.load_tracks(&directory).await?;
            let csv = stats_csv(&tracks)?;
            match output {
                Some(path) => std::fs::write(&path, csv).with_context(|| format!("Failed to write {:?}", path))?,
                None => print!("{}", csv),
            }
        }
        Commands::ExportGpx { directory, segment, output } => {
            let track = data_manager.get_track(&directory, segment).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format!("segment_{}.gpx", segment)));
            std::fs::write(&path, export_gpx(&track)?).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote segment {} to {:?}", segment, path);
        }
        Commands::Geojson { directory } => {
            let tracks = data_manager.load_tracks(&directory).await?;
            let collection = tracks_to_feature_collection(&tracks, &[], 1);
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
        Commands::MapsLink { directory, segment } => {
            let track = data_manager.get_track(&directory, segment).await?;
            println!("{}", google_maps_link(&track.points));
        }
        Commands::ClearCache => {
            let removed = data_manager.clear_cache().await?;
            println!("Removed {} cache files", removed);
        }
    }

    Ok(())
}
