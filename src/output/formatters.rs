//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;

use super::assets::{MAP_SCRIPT, PAGE_STYLE, SCRIPTS, STYLESHEETS};
use crate::assemble::MapDocument;
use crate::error::MapError;
use crate::layers::Feature;

/// 中心グローマーカーの設定
const GLOW_RADIUS: u32 = 12;
const GLOW_COLOR: &str = "yellow";
const GLOW_FILL_OPACITY: f64 = 0.6;
const GLOW_POPUP: &str = "✨ Center Glow ✨";

/// アイコン未指定時のGlyphicon
const DEFAULT_MARKER_ICON: &str = "info-sign";

/// HTML形式のフォーマッター
///
/// Leafletを使ったスタンドアロンのHTMLページを出力します。
/// 地図データはJSONとしてページ内のスクリプトに埋め込まれます。
pub struct HtmlFormatter;

#[derive(Serialize)]
struct HtmlPayload {
    center: [f64; 2],
    zoom: u8,
    cluster: bool,
    fit_bounds: Option<[[f64; 2]; 2]>,
    glow: Option<GlowPayload>,
    tiles: Vec<TilePayload>,
    layers: Vec<LayerPayload>,
}

#[derive(Serialize)]
struct TilePayload {
    name: &'static str,
    url: &'static str,
    attribution: &'static str,
    subdomains: &'static str,
    max_zoom: u8,
}

#[derive(Serialize)]
struct GlowPayload {
    radius: u32,
    color: &'static str,
    fill_opacity: f64,
    popup: &'static str,
}

#[derive(Serialize)]
struct LayerPayload {
    kind: &'static str,
    label: String,
    features: Vec<Value>,
}

impl HtmlFormatter {
    pub fn render<W: Write>(&self, document: &MapDocument, writer: &mut W) -> Result<(), MapError> {
        let options = document.options();

        let payload = HtmlPayload {
            center: document.center().to_array(),
            zoom: options.zoom,
            cluster: options.cluster_markers,
            fit_bounds: if options.fit_bounds {
                document.bounds().map(|b| b.to_corners())
            } else {
                None
            },
            glow: options.center_glow.then_some(GlowPayload {
                radius: GLOW_RADIUS,
                color: GLOW_COLOR,
                fill_opacity: GLOW_FILL_OPACITY,
                popup: GLOW_POPUP,
            }),
            tiles: options
                .tiles
                .iter()
                .map(|tile| TilePayload {
                    name: tile.label(),
                    url: tile.url_template(),
                    attribution: tile.attribution(),
                    subdomains: tile.subdomains(),
                    max_zoom: tile.max_zoom(),
                })
                .collect(),
            layers: document
                .layers()
                .iter()
                .map(|group| LayerPayload {
                    kind: group.kind.sheet_name(),
                    label: group.label(),
                    features: group.features.iter().map(leaflet_feature).collect(),
                })
                .collect(),
        };

        // `</script>`でスクリプトが閉じられないよう`<`をエスケープ
        let payload_json = serde_json::to_string(&payload)?.replace('<', "\\u003c");

        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html>")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "  <meta charset=\"utf-8\" />")?;
        writeln!(
            writer,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />"
        )?;
        writeln!(writer, "  <title>{}</title>", escape_html(&options.title))?;
        for href in STYLESHEETS {
            writeln!(writer, "  <link rel=\"stylesheet\" href=\"{}\" />", href)?;
        }
        for src in SCRIPTS {
            writeln!(writer, "  <script src=\"{}\"></script>", src)?;
        }
        writeln!(writer, "  <style>{}</style>", PAGE_STYLE)?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;
        writeln!(writer, "  <div id=\"map\"></div>")?;
        writeln!(writer, "  <script>")?;
        writeln!(writer, "var payload = {};", payload_json)?;
        writeln!(writer, "{}", MAP_SCRIPT)?;
        writeln!(writer, "  </script>")?;
        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;
        writer.flush()?;
        Ok(())
    }
}

/// Leaflet描画用の地物データ
///
/// ツールチップとポップアップはHTMLとして解釈されるため、ここでエスケープします。
fn leaflet_feature(feature: &Feature) -> Value {
    match feature {
        Feature::Marker(m) => json!({
            "lat": m.position.lat,
            "lon": m.position.lon,
            "tooltip": escape_html(&m.name),
            "popup": popup_html(&m.name, m.description.as_deref()),
            "icon": escape_html(m.style.icon.as_deref().unwrap_or(DEFAULT_MARKER_ICON)),
            "color": m.style.color,
        }),
        Feature::Line(l) => json!({
            "points": l.points.to_arrays(),
            "tooltip": escape_html(&l.name),
            "popup": escape_html(&l.name),
            "color": l.style.color,
            "weight": l.style.weight,
            "opacity": l.style.opacity,
        }),
        Feature::Polygon(p) => json!({
            "points": p.ring.to_arrays(),
            "tooltip": escape_html(&p.name),
            "popup": escape_html(&p.name),
            "color": p.style.color,
            "fill_color": p.style.fill_color,
            "fill_opacity": p.style.fill_opacity,
            "weight": p.style.weight,
        }),
        Feature::Circle(c) => json!({
            "lat": c.center.lat,
            "lon": c.center.lon,
            "radius": c.radius,
            "tooltip": escape_html(&c.name),
            "popup": popup_html(&c.name, c.description.as_deref()),
            "color": c.style.color,
            "fill_color": c.style.fill_color,
            "fill_opacity": c.style.fill_opacity,
            "weight": c.style.weight,
        }),
        Feature::HeatPoint(h) => json!({
            "lat": h.position.lat,
            "lon": h.position.lon,
            "intensity": h.intensity,
        }),
    }
}

/// `<b>名前</b><br>説明`形式のポップアップ
fn popup_html(name: &str, description: Option<&str>) -> String {
    let mut html = format!("<b>{}</b>", escape_html(name));
    if let Some(description) = description {
        html.push_str("<br>");
        html.push_str(&escape_html(description));
    }
    html
}

/// HTML特殊文字をエスケープ
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// GeoJSON形式のフォーマッター
///
/// 座標は`[経度, 緯度]`の順です。各地物の`layer`プロパティにシート名が入ります。
pub struct GeoJsonFormatter;

impl GeoJsonFormatter {
    pub fn render<W: Write>(&self, document: &MapDocument, writer: &mut W) -> Result<(), MapError> {
        let features: Vec<Value> = document
            .layers()
            .iter()
            .flat_map(|group| group.features.iter().map(geojson_feature))
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some(b) = document.bounds() {
            collection["bbox"] = json!([b.west, b.south, b.east, b.north]);
        }

        serde_json::to_writer_pretty(&mut *writer, &collection)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn geojson_feature(feature: &Feature) -> Value {
    let layer = feature.kind().sheet_name();
    let (geometry, properties) = match feature {
        Feature::Marker(m) => (
            json!({ "type": "Point", "coordinates": [m.position.lon, m.position.lat] }),
            json!({
                "layer": layer,
                "name": m.name,
                "description": m.description,
                "icon": m.style.icon,
                "color": m.style.color,
            }),
        ),
        Feature::Line(l) => (
            json!({ "type": "LineString", "coordinates": l.points.to_lon_lat() }),
            json!({
                "layer": layer,
                "name": l.name,
                "color": l.style.color,
                "weight": l.style.weight,
                "opacity": l.style.opacity,
            }),
        ),
        Feature::Polygon(p) => (
            json!({ "type": "Polygon", "coordinates": [p.ring.to_lon_lat()] }),
            json!({
                "layer": layer,
                "name": p.name,
                "color": p.style.color,
                "fill_color": p.style.fill_color,
                "fill_opacity": p.style.fill_opacity,
                "weight": p.style.weight,
            }),
        ),
        Feature::Circle(c) => (
            json!({ "type": "Point", "coordinates": [c.center.lon, c.center.lat] }),
            json!({
                "layer": layer,
                "name": c.name,
                "description": c.description,
                "radius": c.radius,
                "color": c.style.color,
                "fill_color": c.style.fill_color,
                "fill_opacity": c.style.fill_opacity,
                "weight": c.style.weight,
            }),
        ),
        Feature::HeatPoint(h) => (
            json!({ "type": "Point", "coordinates": [h.position.lon, h.position.lat] }),
            json!({
                "layer": layer,
                "intensity": h.intensity,
            }),
        ),
    };

    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}
