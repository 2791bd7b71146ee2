//! xlsxmap - Spreadsheet-to-Leaflet map generator
//!
//! This crate reads a spreadsheet whose sheets are named `markers`, `lines`,
//! `polygons`, `circles` and `heatmap`, turns every row into a geographic feature,
//! and renders a self-contained interactive Leaflet HTML page (or a GeoJSON
//! `FeatureCollection`).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxmap::MapBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a generator with default settings
//!     let generator = MapBuilder::new().build()?;
//!
//!     let input = File::open("places.xlsx")?;
//!     let output = File::create("map.html")?;
//!
//!     // Rows that cannot be turned into features are skipped and reported
//!     let report = generator.generate(input, output)?;
//!     for skipped in &report.skipped {
//!         eprintln!("{} row {}: {}", skipped.sheet, skipped.row, skipped.error);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxmap::{MapBuilder, OutputFormat, PolygonClosure, TileStyle};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = MapBuilder::new()
//!         .with_zoom(13)
//!         .with_center(40.7128, -74.0060)
//!         .with_tiles(vec![TileStyle::CartoDbDarkMatter, TileStyle::OpenStreetMap])
//!         .with_marker_clustering(false)
//!         .with_polygon_closure(PolygonClosure::Reject)
//!         .with_output_format(OutputFormat::GeoJson)
//!         .build()?;
//!
//!     let input = File::open("places.xlsx")?;
//!     let output = File::create("map.geojson")?;
//!     generator.generate(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Inspecting the assembled map
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxmap::{MapBuilder, SheetKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = MapBuilder::new().build()?;
//!     let (document, _report) = generator.load(File::open("places.xlsx")?)?;
//!
//!     println!("center: {:?}", document.center());
//!     println!("markers: {}", document.feature_count(SheetKind::Markers));
//!
//!     Ok(())
//! }
//! ```

mod api;
mod assemble;
mod builder;
mod coords;
mod error;
mod layers;
mod normalize;
mod output;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{OutputFormat, PolygonClosure, SheetKind, TileStyle};
pub use assemble::{LayerGroup, MapDocument, MapOptions, DEFAULT_CENTER};
pub use builder::{GenerationReport, MapBuilder, MapGenerator, SkippedRow};
pub use coords::parse_coordinates;
pub use error::{CoordinateError, MapError, RowError};
pub use layers::{
    AreaStyle, Circle, Feature, HeatPoint, Line, LineStyle, Marker, MarkerStyle, Polygon,
};
pub use types::{Bounds, CoordinateList, LatLng};
