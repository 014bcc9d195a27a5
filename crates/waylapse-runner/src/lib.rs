//! CLI surface for the waylapse pipeline.
//!
//! Two subcommands: `fetch` builds or resumes the tile archive, `analyze`
//! runs the vegetation classifier over it. Defaults match the reference
//! pipeline (zoom 18, all points, all years, 100 ms fetch delay).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use waylapse_archive::{ArchiveConfig, ArchiveStats, Archiver};
use waylapse_green::GreenSummary;
use waylapse_wayback::{WaybackClient, DEFAULT_ZOOM};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Wayback service error (the catalog fetch is the fatal case).
    #[error(transparent)]
    Wayback(#[from] waylapse_wayback::WaybackError),

    /// Archive pipeline error.
    #[error(transparent)]
    Archive(#[from] waylapse_archive::ArchiveError),

    /// Classifier error.
    #[error(transparent)]
    Green(#[from] waylapse_green::GreenError),
}

/// Historical satellite tile archiver and vegetation scorer.
#[derive(Debug, Parser)]
#[command(name = "waylapse", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build or resume the tile archive from the Wayback service.
    Fetch(FetchArgs),
    /// Score archived tiles for vegetation coverage.
    Analyze(AnalyzeArgs),
}

/// Arguments for `waylapse fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// GeoJSON file with the points of interest.
    #[arg(long, default_value = "points.geojson")]
    pub points: PathBuf,

    /// Archive root directory.
    #[arg(long, default_value = "tiles")]
    pub out: PathBuf,

    /// Tile zoom level (18 = building, 17 = block, 16 = neighborhood).
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Limit the number of points processed (0 = all).
    #[arg(long, default_value_t = 0)]
    pub max_points: usize,

    /// Skip releases from years before this one (0 = all years).
    #[arg(long, default_value_t = 0)]
    pub min_year: i32,

    /// Delay between network fetches, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,
}

/// Arguments for `waylapse analyze`.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Archive root directory.
    #[arg(long, default_value = "tiles")]
    pub out: PathBuf,
}

/// Build or resume the tile archive.
pub fn run_fetch(args: &FetchArgs) -> Result<ArchiveStats, RunnerError> {
    let client = WaybackClient::new()?;

    info!(zoom = args.zoom, "fetching release catalog");
    let releases = client.fetch_catalog(args.min_year)?;
    info!(releases = releases.len(), "release catalog loaded");

    let config = ArchiveConfig {
        points_file: args.points.clone(),
        root: args.out.clone(),
        zoom: args.zoom,
        max_points: args.max_points,
        delay: Duration::from_millis(args.delay_ms),
        ..ArchiveConfig::default()
    };

    let stats = Archiver::new(config).run(&releases, &client)?;
    Ok(stats)
}

/// Score the archived tiles and annotate the manifest.
pub fn run_analyze(args: &AnalyzeArgs) -> Result<GreenSummary, RunnerError> {
    let summary = waylapse_green::annotate(&args.out)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults_match_reference() {
        let cli = Cli::parse_from(["waylapse", "fetch"]);
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch subcommand");
        };
        assert_eq!(args.points, PathBuf::from("points.geojson"));
        assert_eq!(args.out, PathBuf::from("tiles"));
        assert_eq!(args.zoom, 18);
        assert_eq!(args.max_points, 0);
        assert_eq!(args.min_year, 0);
        assert_eq!(args.delay_ms, 100);
    }

    #[test]
    fn test_fetch_flags_parse() {
        let cli = Cli::parse_from([
            "waylapse",
            "fetch",
            "--points",
            "sites.geojson",
            "--zoom",
            "16",
            "--min-year",
            "2020",
            "--max-points",
            "5",
        ]);
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch subcommand");
        };
        assert_eq!(args.points, PathBuf::from("sites.geojson"));
        assert_eq!(args.zoom, 16);
        assert_eq!(args.min_year, 2020);
        assert_eq!(args.max_points, 5);
    }

    #[test]
    fn test_analyze_parses() {
        let cli = Cli::parse_from(["waylapse", "analyze", "--out", "archive"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        assert_eq!(args.out, PathBuf::from("archive"));
    }
}
