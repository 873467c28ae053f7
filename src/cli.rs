//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::{FeedSource, FeedType};
use crate::config::{MapConfig, TileLayerConfig};
use crate::encoding::MagnitudeScale;
use crate::output::Format;

/// Render recent earthquakes on an interactive world map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the map to a standalone HTML page
    Render(RenderArgs),

    /// Print the map markers
    Markers(MarkersArgs),

    /// Serve the map over HTTP
    Serve(ServeArgs),
}

/// Options shared by every command that builds a map.
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// USGS summary feed to fetch
    #[arg(long, default_value = "all_day", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Fetch the feed from this URL instead of USGS
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,

    /// Read the feed from a saved GeoJSON file
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Tile URL template for the base map (default: Mapbox light)
    #[arg(long)]
    pub tiles: Option<String>,

    /// Access token for the tile provider
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Marker radius in meters per unit of magnitude
    #[arg(long, default_value = "20000", value_parser = parse_radius_scale)]
    pub radius_scale: f64,

    /// Magnitude buckets as upper:label:color,...,label:color
    #[arg(long, value_parser = parse_scale)]
    pub scale: Option<MagnitudeScale>,

    /// Map center: lat,lon
    #[arg(long, default_value = "20,0", value_parser = parse_center)]
    pub center: (f64, f64),

    /// Initial zoom level
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u8).range(0..=18))]
    pub zoom: u8,
}

impl MapArgs {
    /// Where to load the feed from.
    #[must_use]
    pub fn source(&self) -> FeedSource {
        match (&self.input, &self.url) {
            (Some(path), _) => FeedSource::File(path.clone()),
            (None, Some(url)) => FeedSource::Url(url.clone()),
            (None, None) => FeedSource::Usgs(self.feed),
        }
    }

    /// Build the immutable map configuration.
    #[must_use]
    pub fn map_config(&self) -> MapConfig {
        let mut tile_layer = match &self.tiles {
            Some(template) => TileLayerConfig::xyz("Base Map", template.clone()),
            None => TileLayerConfig::default(),
        };
        tile_layer.access_token.clone_from(&self.access_token);

        MapConfig {
            center: self.center,
            zoom: self.zoom,
            radius_scale: self.radius_scale,
            tile_layer,
            scale: self.scale.clone().unwrap_or_default(),
            ..MapConfig::default()
        }
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Write the page here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `markers` command.
#[derive(Parser, Debug)]
pub struct MarkersArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a magnitude scale from string.
fn parse_scale(s: &str) -> Result<MagnitudeScale, String> {
    s.parse()
}

/// Parse a radius scale; it must be finite and positive.
fn parse_radius_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid radius scale: {e}"))?;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("radius scale must be finite and positive, got {scale}"));
    }
    Ok(scale)
}

/// Parse a map center from `lat,lon`.
fn parse_center(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("center requires 2 values (lat,lon), got {}", parts.len()));
    }

    let lat: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }
    Ok((lat, lon))
}
