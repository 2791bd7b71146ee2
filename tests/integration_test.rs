//! Integration Tests for xlsxmap
//!
//! rust_xlsxwriterで生成したワークブックを入力に、HTML/GeoJSON出力全体を検証します。

use rust_xlsxwriter::*;
use serde_json::Value;
use std::io::Cursor;
use xlsxmap::{
    CoordinateError, LatLng, MapBuilder, MapError, OutputFormat, PolygonClosure, RowError,
    SheetKind,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// ヘッダー行とデータ行からシートを作成する
    pub fn add_sheet(
        workbook: &mut Workbook,
        name: &str,
        header: &[&str],
        rows: &[Vec<CellData>],
    ) -> Result<(), XlsxError> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        for (col, title) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                let (r, col) = (r as u32 + 1, col as u16);
                match cell {
                    CellData::Num(n) => {
                        worksheet.write_number(r, col, *n)?;
                    }
                    CellData::Text(s) => {
                        worksheet.write_string(r, col, *s)?;
                    }
                    CellData::Blank => {}
                }
            }
        }
        Ok(())
    }

    pub enum CellData {
        Num(f64),
        Text(&'static str),
        Blank,
    }

    /// ニューヨークのマーカー1件
    pub fn generate_single_marker() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(
            &mut workbook,
            "markers",
            &["latitude", "longitude", "name", "description", "color", "icon"],
            &[vec![
                CellData::Num(40.7128),
                CellData::Num(-74.0060),
                CellData::Text("NYC"),
                CellData::Text("Big Apple"),
                CellData::Text("red"),
                CellData::Text("star"),
            ]],
        )?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 5種類すべてのシートを含むワークブック
    pub fn generate_all_layers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(
            &mut workbook,
            "markers",
            &["latitude", "longitude", "name"],
            &[
                vec![CellData::Num(0.0), CellData::Num(0.0), CellData::Text("A")],
                vec![CellData::Num(2.0), CellData::Num(2.0), CellData::Text("B")],
            ],
        )?;
        add_sheet(
            &mut workbook,
            "lines",
            &["coordinates", "name", "color"],
            &[
                vec![
                    CellData::Text("[[0, 0], [1, 1]]"),
                    CellData::Text("Route"),
                    CellData::Text("green"),
                ],
                vec![CellData::Text("not a list"), CellData::Text("Broken"), CellData::Blank],
            ],
        )?;
        add_sheet(
            &mut workbook,
            "polygons",
            &["coordinates", "name"],
            &[vec![CellData::Text("0,0; 0,1; 1,1"), CellData::Text("Park")]],
        )?;
        add_sheet(
            &mut workbook,
            "circles",
            &["latitude", "longitude", "radius"],
            &[vec![CellData::Num(1.0), CellData::Num(1.0), CellData::Num(250.0)]],
        )?;
        add_sheet(
            &mut workbook,
            "heatmap",
            &["latitude", "longitude", "intensity"],
            &[vec![CellData::Num(1.0), CellData::Num(1.0), CellData::Num(0.5)]],
        )?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 2点のマーカー (0,0), (2,2)
    pub fn generate_two_markers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(
            &mut workbook,
            "markers",
            &["latitude", "longitude"],
            &[
                vec![CellData::Num(0.0), CellData::Num(0.0)],
                vec![CellData::Num(2.0), CellData::Num(2.0)],
            ],
        )?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 未知のシートのみを含むワークブック
    pub fn generate_unrecognized() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(&mut workbook, "Sheet1", &["a", "b"], &[])?;
        add_sheet(&mut workbook, "Markers", &["latitude", "longitude"], &[])?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 閉じていないポリゴン
    pub fn generate_open_polygon() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(
            &mut workbook,
            "polygons",
            &["coordinates", "name", "color"],
            &[vec![
                CellData::Text("[[0, 0], [0, 4], [4, 4], [4, 0]]"),
                CellData::Text("Square"),
                CellData::Text("purple"),
            ]],
        )?;
        Ok(workbook.save_to_buffer()?)
    }

    /// JSON形式と区切り文字形式の同じ線
    pub fn generate_equivalent_lines() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        add_sheet(
            &mut workbook,
            "lines",
            &["coordinates"],
            &[
                vec![CellData::Text("[[35.6, 139.7], [34.7, 135.5]]")],
                vec![CellData::Text("35.6,139.7;34.7,135.5")],
            ],
        )?;
        Ok(workbook.save_to_buffer()?)
    }
}

use fixtures::CellData;

/// HTMLに埋め込まれたJSONペイロードを取り出す
fn embedded_payload(html: &str) -> Value {
    let line = html
        .lines()
        .find(|l| l.starts_with("var payload = "))
        .expect("payload line");
    let json = line
        .trim_start_matches("var payload = ")
        .trim_end_matches(';');
    serde_json::from_str(json).expect("payload JSON")
}

fn layer<'a>(payload: &'a Value, kind: &str) -> Option<&'a Value> {
    payload["layers"]
        .as_array()
        .and_then(|layers| layers.iter().find(|l| l["kind"] == kind))
}

#[test]
fn test_single_marker_html() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_single_marker().unwrap();

    let (html, report) = generator.generate_to_string(Cursor::new(data)).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("leaflet.js"));
    assert!(html.contains("<div id=\"map\"></div>"));

    let payload = embedded_payload(&html);
    assert_eq!(payload["center"], serde_json::json!([40.7128, -74.006]));
    assert_eq!(payload["zoom"], 10);
    assert_eq!(payload["cluster"], true);

    let markers = layer(&payload, "markers").expect("markers layer");
    assert_eq!(markers["label"], "Markers (1)");
    let marker = &markers["features"][0];
    assert_eq!(marker["tooltip"], "NYC");
    assert_eq!(marker["popup"], "<b>NYC</b><br>Big Apple");
    assert_eq!(marker["color"], "red");
    assert_eq!(marker["icon"], "star");

    assert_eq!(report.sheets, vec![SheetKind::Markers]);
    assert_eq!(report.feature_count(SheetKind::Markers), 1);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_center_is_mean_of_points() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_two_markers().unwrap();

    let (document, _) = generator.load(Cursor::new(data)).unwrap();

    assert_eq!(document.center(), LatLng::new(1.0, 1.0));
}

#[test]
fn test_explicit_center_and_zoom() {
    let generator = MapBuilder::new()
        .with_center(51.5, -0.12)
        .with_zoom(4)
        .build()
        .unwrap();
    let data = fixtures::generate_two_markers().unwrap();

    let (html, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    assert_eq!(payload["center"], serde_json::json!([51.5, -0.12]));
    assert_eq!(payload["zoom"], 4);
}

#[test]
fn test_all_layers_with_bad_row_skipped() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_all_layers().unwrap();

    let (html, report) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    let kinds: Vec<&str> = payload["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["markers", "polygons", "circles", "heatmap", "lines"]);

    let lines = layer(&payload, "lines").unwrap();
    assert_eq!(lines["features"].as_array().unwrap().len(), 1);
    assert_eq!(lines["features"][0]["color"], "green");

    // 区切り文字形式のポリゴンは自動で閉じられる
    let polygon = &layer(&payload, "polygons").unwrap()["features"][0];
    assert_eq!(
        polygon["points"],
        serde_json::json!([[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]])
    );

    let circle = &layer(&payload, "circles").unwrap()["features"][0];
    assert_eq!(circle["radius"], 250.0);

    let heat = &layer(&payload, "heatmap").unwrap()["features"][0];
    assert_eq!(heat["intensity"], 0.5);

    assert_eq!(report.skipped.len(), 1);
    let skipped = &report.skipped[0];
    assert_eq!(skipped.sheet, SheetKind::Lines);
    assert_eq!(skipped.row, 3);
    assert!(matches!(
        skipped.error,
        RowError::Coordinates(CoordinateError::Malformed { .. })
    ));
    assert_eq!(report.total_features(), 6);
}

#[test]
fn test_json_and_delimited_coordinates_agree() {
    let generator = MapBuilder::new()
        .with_output_format(OutputFormat::GeoJson)
        .build()
        .unwrap();
    let data = fixtures::generate_equivalent_lines().unwrap();

    let (geojson, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let value: Value = serde_json::from_str(&geojson).unwrap();

    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"], features[1]["geometry"]);
    assert_eq!(
        features[0]["geometry"]["coordinates"],
        serde_json::json!([[139.7, 35.6], [135.5, 34.7]])
    );
}

#[test]
fn test_open_polygon_auto_closed() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_open_polygon().unwrap();

    let (html, report) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    let polygon = &layer(&payload, "polygons").unwrap()["features"][0];
    let points = polygon["points"].as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points.first(), points.last());
    assert_eq!(polygon["color"], "purple");
    assert_eq!(polygon["fill_color"], "purple");
    assert_eq!(polygon["fill_opacity"], 0.4);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_open_polygon_rejected() {
    let generator = MapBuilder::new()
        .with_polygon_closure(PolygonClosure::Reject)
        .build()
        .unwrap();
    let data = fixtures::generate_open_polygon().unwrap();

    let (document, report) = generator.load(Cursor::new(data)).unwrap();

    assert_eq!(document.total_features(), 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].error,
        RowError::Coordinates(CoordinateError::OpenRing)
    );
}

#[test]
fn test_no_recognized_sheets() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_unrecognized().unwrap();

    match generator.generate_to_string(Cursor::new(data)) {
        Err(MapError::NoRecognizedSheets { found }) => {
            assert_eq!(found, vec!["Sheet1".to_string(), "Markers".to_string()]);
        }
        other => panic!("Expected NoRecognizedSheets, got {:?}", other),
    }
}

#[test]
fn test_absent_sheets_produce_no_layers() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_single_marker().unwrap();

    let (html, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    assert_eq!(payload["layers"].as_array().unwrap().len(), 1);
    assert!(layer(&payload, "lines").is_none());
    assert!(layer(&payload, "heatmap").is_none());
}

#[test]
fn test_options_reflected_in_payload() {
    let generator = MapBuilder::new()
        .with_marker_clustering(false)
        .with_center_glow(false)
        .with_fit_bounds(true)
        .with_title("Trip <2024>")
        .build()
        .unwrap();
    let data = fixtures::generate_two_markers().unwrap();

    let (html, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    assert_eq!(payload["cluster"], false);
    assert!(payload["glow"].is_null());
    assert_eq!(
        payload["fit_bounds"],
        serde_json::json!([[0.0, 0.0], [2.0, 2.0]])
    );
    assert!(html.contains("<title>Trip &lt;2024&gt;</title>"));
}

#[test]
fn test_default_glow_and_tiles() {
    let generator = MapBuilder::new().build().unwrap();
    let data = fixtures::generate_two_markers().unwrap();

    let (html, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let payload = embedded_payload(&html);

    assert_eq!(payload["glow"]["radius"], 12);
    assert_eq!(payload["glow"]["color"], "yellow");
    let names: Vec<&str> = payload["tiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["OpenStreetMap", "Light Mode", "Dark Mode"]);
}

#[test]
fn test_geojson_output() {
    let generator = MapBuilder::new()
        .with_output_format(OutputFormat::GeoJson)
        .build()
        .unwrap();
    let data = fixtures::generate_single_marker().unwrap();

    let (geojson, _) = generator.generate_to_string(Cursor::new(data)).unwrap();
    let value: Value = serde_json::from_str(&geojson).unwrap();

    assert_eq!(value["type"], "FeatureCollection");
    let feature = &value["features"][0];
    assert_eq!(feature["geometry"]["type"], "Point");
    assert_eq!(
        feature["geometry"]["coordinates"],
        serde_json::json!([-74.006, 40.7128])
    );
    assert_eq!(feature["properties"]["layer"], "markers");
    assert_eq!(feature["properties"]["name"], "NYC");
}

#[test]
fn test_generate_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("places.xlsx");
    let output_path = dir.path().join("map.html");
    std::fs::write(&input_path, fixtures::generate_single_marker().unwrap()).unwrap();

    let generator = MapBuilder::new().build().unwrap();
    let input = std::fs::File::open(&input_path).unwrap();
    let output = std::fs::File::create(&output_path).unwrap();
    let report = generator.generate(input, output).unwrap();

    assert_eq!(report.total_features(), 1);
    let html = std::fs::read_to_string(&output_path).unwrap();
    assert!(html.contains("Markers (1)"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_markup_in_cells_is_escaped() {
    let mut workbook = Workbook::new();
    fixtures::add_sheet(
        &mut workbook,
        "markers",
        &["latitude", "longitude", "name"],
        &[vec![
            CellData::Num(10.0),
            CellData::Num(10.0),
            CellData::Text("<script>alert(1)</script>"),
        ]],
    )
    .unwrap();
    let data = workbook.save_to_buffer().unwrap();

    let generator = MapBuilder::new().build().unwrap();
    let (html, _) = generator.generate_to_string(Cursor::new(data)).unwrap();

    assert!(!html.contains("<script>alert(1)"));
    let payload = embedded_payload(&html);
    assert_eq!(
        layer(&payload, "markers").unwrap()["features"][0]["tooltip"],
        "&lt;script&gt;alert(1)&lt;/script&gt;"
    );
}
