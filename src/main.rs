//! Event map clustering tool
//!
//! Reads events from a CSV file, clusters them for one map viewport, and
//! writes the resulting markers as CSV or JSON.

use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use event_map_cluster::cluster::{
    ClusterController, ClusterInput, ClusterOptions, ClusterSet, Event, MapBounds, ViewportSize,
    ZoomTable, category_style,
};

#[cfg(test)]
mod main_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "event_map_cluster")]
#[command(about = "Cluster event markers for a map viewport", long_about = None)]
struct Args {
    /// Input CSV file with an `id,title,category,lat,lng,...` header
    #[arg(short, long, default_value = "events.csv")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Northern edge of the viewport in degrees
    #[arg(long, allow_hyphen_values = true)]
    north: Option<f64>,

    /// Southern edge of the viewport in degrees
    #[arg(long, allow_hyphen_values = true)]
    south: Option<f64>,

    /// Eastern edge of the viewport in degrees
    #[arg(long, allow_hyphen_values = true)]
    east: Option<f64>,

    /// Western edge of the viewport in degrees
    #[arg(long, allow_hyphen_values = true)]
    west: Option<f64>,

    /// Padding added around fitted bounds, as a fraction of the span
    #[arg(long, default_value_t = 0.05)]
    padding: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Map zoom level
    #[arg(short, long, default_value_t = 10.0)]
    zoom: f64,

    /// Minimum events per cluster (overrides the zoom table)
    #[arg(short = 'm', long)]
    min_cluster_size: Option<usize>,

    /// Merge distance in pixels (overrides the zoom table)
    #[arg(short = 'r', long)]
    max_distance: Option<f64>,

    /// Emit one marker per event
    #[arg(long)]
    no_cluster: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let events = match read_events(&args.input) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error reading CSV: {}", e);
            std::process::exit(1);
        }
    };
    info!("Read {} events from {:?}", events.len(), args.input);

    let bounds = match resolve_bounds(&args, &events) {
        Ok(bounds) => bounds,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    debug!("Viewport bounds {:?}, size {}x{}", bounds, args.width, args.height);

    let mut controller = ClusterController::new(ZoomTable::default());
    let mut input = ClusterInput::new(&events, args.zoom)
        .with_enabled(!args.no_cluster)
        .with_options(ClusterOptions {
            min_cluster_size: args.min_cluster_size,
            max_distance: args.max_distance,
        });
    input.bounds = bounds;
    input.viewport = Some(ViewportSize::new(args.width, args.height));

    let set = controller.compute(&input);
    info!(
        "{} events -> {} clusters, {} single events",
        set.stats.total, set.stats.cluster_count, set.stats.single_event_count
    );

    let result = match &args.output {
        None => write_clusters(io::stdout().lock(), &set, args.format, controller.table()),
        Some(path) => match File::create(path) {
            Ok(file) => write_clusters(file, &set, args.format, controller.table()),
            Err(e) => Err(e.into()),
        },
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}

/// Reads events from a CSV file with a header row
///
/// Coordinate, time, price and status columns may be empty or absent.
fn read_events(filename: &PathBuf) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut events = Vec::new();
    for result in reader.deserialize() {
        let event: Event = result?;
        events.push(event);
    }
    Ok(events)
}

/// Picks explicit bounds when all four edges are given, otherwise fits the
/// bounds around the located events
///
/// Returns `Ok(None)` when nothing is located and no edges were passed; the
/// controller then shows every event on its own.
fn resolve_bounds(
    args: &Args,
    events: &[Event],
) -> Result<Option<MapBounds>, Box<dyn std::error::Error>> {
    match (args.north, args.south, args.east, args.west) {
        (Some(north), Some(south), Some(east), Some(west)) => {
            Ok(Some(MapBounds::new(north, south, east, west)))
        }
        (None, None, None, None) => Ok(MapBounds::fit(events, args.padding)),
        _ => Err("either pass all of --north, --south, --east, --west or none".into()),
    }
}

/// Writes clusters in the requested format
fn write_clusters<W: Write>(
    out: W,
    set: &ClusterSet,
    format: OutputFormat,
    table: &ZoomTable,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => write_clusters_csv(out, set, table),
        OutputFormat::Json => {
            let mut out = out;
            serde_json::to_writer_pretty(&mut out, set)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

/// Writes one CSV row per cluster; member ids are joined with `;`
fn write_clusters_csv<W: Write>(
    out: W,
    set: &ClusterSet,
    table: &ZoomTable,
) -> Result<(), Box<dyn std::error::Error>> {
    let breakpoints = table.breakpoints();
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record([
        "id",
        "is_cluster",
        "count",
        "lat",
        "lng",
        "x",
        "y",
        "category",
        "marker",
        "label",
        "color",
        "event_ids",
    ])?;

    let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for c in &set.clusters {
        let style = category_style(&c.category);
        writer.write_record([
            c.id.clone(),
            c.is_cluster.to_string(),
            c.count.to_string(),
            opt(c.center.map(|p| p.lat)),
            opt(c.center.map(|p| p.lng)),
            opt(c.pixel.map(|p| p.x())),
            opt(c.pixel.map(|p| p.y())),
            c.category.clone(),
            c.marker_size(&breakpoints).as_str().to_string(),
            style.label.to_string(),
            style.color.to_string(),
            c.event_ids().collect::<Vec<_>>().join(";"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
