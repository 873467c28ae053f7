//! quakemap - Recent earthquakes on an interactive world map.
//!
//! Fetches a USGS GeoJSON summary feed, encodes each event as a circle
//! marker colored and sized by magnitude, and renders a Leaflet page with
//! a legend and a layer control.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

mod cli;
mod client;
mod composer;
mod config;
mod encoding;
mod errors;
mod html;
mod legend;
mod markers;
mod models;
mod output;
mod server;

use cli::{Cli, Command};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Markers(args) => cmd_markers(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `render` command - fetch once and write the map page.
fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let source = args.map.source();
    let feed = source
        .load()
        .with_context(|| format!("failed to load earthquake feed from {}", source.describe()))?;

    let view = composer::compose(&feed, &args.map.map_config()).context("failed to compose map")?;
    let page = html::render_page(&view).context("failed to render map page")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, page)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                "wrote map with {} earthquakes to {}",
                view.overlay.markers.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(page.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// Execute the `markers` command - print the encoded markers.
fn cmd_markers(args: cli::MarkersArgs) -> Result<()> {
    let source = args.map.source();
    let feed = source
        .load()
        .with_context(|| format!("failed to load earthquake feed from {}", source.describe()))?;

    let config = args.map.map_config();
    let quakes = feed.earthquakes().context("earthquake feed was malformed")?;
    let markers = markers::build_markers(&quakes, &config.encoder());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_markers(&mut handle, &markers, &config.scale, args.format)?;

    Ok(())
}

/// Execute the `serve` command - start web server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let source = args.map.source();
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        source: source.clone(),
        map: args.map.map_config(),
    };

    if !config.map.tile_layer.is_renderable() {
        tracing::warn!("no tile access token set (--access-token or MAPBOX_ACCESS_TOKEN)");
    }

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", source.describe());
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    // Run the async server on tokio runtime
    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}
