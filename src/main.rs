//! xlsxmap command-line interface
//!
//! Reads a spreadsheet and writes a standalone Leaflet HTML map (or GeoJSON).

use std::fs::{self, File};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::FmtSubscriber;
use xlsxmap::{GenerationReport, MapBuilder, MapError, OutputFormat, PolygonClosure};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Geojson,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Geojson => OutputFormat::GeoJson,
        }
    }
}

/// Generate an interactive map from a spreadsheet with `markers`, `lines`,
/// `polygons`, `circles` and `heatmap` sheets.
#[derive(Debug, Parser)]
#[command(name = "xlsxmap", version, about)]
struct Cli {
    /// Input spreadsheet (.xlsx, .xls, .ods)
    input: PathBuf,

    /// Output file
    #[arg(default_value = "map.html")]
    output: PathBuf,

    /// Initial zoom level (0-18)
    #[arg(
        short,
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u8).range(0..=18)
    )]
    zoom: u8,

    /// Map center latitude (defaults to the mean of all features)
    #[arg(long, requires = "center_lon", allow_hyphen_values = true)]
    center_lat: Option<f64>,

    /// Map center longitude
    #[arg(long, requires = "center_lat", allow_hyphen_values = true)]
    center_lon: Option<f64>,

    /// Do not cluster markers
    #[arg(long)]
    no_cluster: bool,

    /// Do not draw the glow marker at the map center
    #[arg(long)]
    no_glow: bool,

    /// Fit the initial view to the bounds of all features
    #[arg(long)]
    fit_bounds: bool,

    /// Skip polygons whose ring is not closed instead of closing them
    #[arg(long)]
    reject_open_polygons: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Html)]
    format: FormatArg,

    /// HTML page title
    #[arg(short, long, default_value = "xlsxmap")]
    title: String,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(match cli.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install log subscriber: {}", e);
    }

    match run(&cli) {
        Ok(report) => print_summary(&cli, &report),
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<GenerationReport, MapError> {
    let mut builder = MapBuilder::new()
        .with_zoom(cli.zoom)
        .with_marker_clustering(!cli.no_cluster)
        .with_center_glow(!cli.no_glow)
        .with_fit_bounds(cli.fit_bounds)
        .with_title(cli.title.clone())
        .with_output_format(cli.format.into());

    if let (Some(lat), Some(lon)) = (cli.center_lat, cli.center_lon) {
        builder = builder.with_center(lat, lon);
    }
    if cli.reject_open_polygons {
        builder = builder.with_polygon_closure(PolygonClosure::Reject);
    }

    let generator = builder.build()?;

    // 失敗時に既存の出力を壊さないよう、生成に成功してから書き込む
    let input = File::open(&cli.input)?;
    let (rendered, report) = generator.generate_to_string(input)?;
    fs::write(&cli.output, rendered)?;

    Ok(report)
}

fn print_summary(cli: &Cli, report: &GenerationReport) {
    for (kind, count) in &report.features {
        println!("  {:<10} {}", kind.label(), count);
    }
    if !report.skipped.is_empty() {
        println!("  skipped    {} row(s)", report.skipped.len());
    }
    println!(
        "Map generated: {} -> {}",
        cli.input.display(),
        cli.output.display()
    );
}

fn handle_error(error: MapError) {
    match error {
        MapError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        MapError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid spreadsheet or may be corrupted.");
        }
        MapError::Json(json_err) => {
            eprintln!("Serialization Error: {}", json_err);
        }
        MapError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        MapError::NoRecognizedSheets { found } => {
            eprintln!("No recognized sheets in the workbook.");
            eprintln!("  Expected: markers, lines, polygons, circles, heatmap");
            eprintln!("  Found:    {}", found.join(", "));
        }
        MapError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file exceeds security limits.");
        }
    }
}
