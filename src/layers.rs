//! Layer Builders Module
//!
//! 正規化済みの行から、描画可能な地物（[`Feature`]）を生成するモジュール。
//! ジオメトリの種類ごとにビルダー関数とスタイル構造体を持ちます。
//!
//! # 列とデフォルト値
//!
//! | シート     | 必須列                  | 任意列（デフォルト） |
//! |------------|-------------------------|----------------------|
//! | `markers`  | latitude, longitude     | name ("Marker"), description, icon, color ("blue") |
//! | `lines`    | coordinates（2点以上）  | name ("Line"), color ("blue"), weight (3), opacity (0.8) |
//! | `polygons` | coordinates（2点以上）  | name ("Area"), color ("blue"), fill_color, fill_opacity (0.4), weight (2) |
//! | `circles`  | latitude, longitude     | radius (500), name ("Circle"), description, color ("blue"), fill_color, fill_opacity (0.4), weight (2) |
//! | `heatmap`  | latitude, longitude     | intensity (1.0) |
//!
//! `fill_color`が空の場合は`color`列の値、それも空の場合は`"lightblue"`になります。

use tracing::warn;

use crate::api::{PolygonClosure, SheetKind};
use crate::coords::{close_ring, require_points};
use crate::error::RowError;
use crate::normalize::RowView;
use crate::types::{CoordinateList, LatLng, Record};

/// AwesomeMarkersが描画できるマーカー色
const MARKER_COLORS: [&str; 19] = [
    "red",
    "darkred",
    "orange",
    "green",
    "darkgreen",
    "blue",
    "purple",
    "darkpurple",
    "cadetblue",
    "lightred",
    "beige",
    "lightgreen",
    "lightblue",
    "pink",
    "white",
    "lightgray",
    "gray",
    "black",
    "darkblue",
];

/// マーカーのスタイル
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// マーカー色（デフォルト: `"blue"`）
    pub color: String,
    /// Glyphiconのアイコン名（デフォルト: なし = `"info-sign"`で描画）
    pub icon: Option<String>,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            icon: None,
        }
    }
}

/// ラインのスタイル
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// 線の色（デフォルト: `"blue"`）
    pub color: String,
    /// 線幅（ピクセル、デフォルト: 3）
    pub weight: u32,
    /// 不透明度（0〜1、デフォルト: 0.8）
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            weight: 3,
            opacity: 0.8,
        }
    }
}

/// 面（ポリゴン・円）のスタイル
#[derive(Debug, Clone, PartialEq)]
pub struct AreaStyle {
    /// 枠線の色（デフォルト: `"blue"`）
    pub color: String,
    /// 塗りつぶし色（デフォルト: `color`列、なければ`"lightblue"`）
    pub fill_color: String,
    /// 塗りつぶしの不透明度（0〜1、デフォルト: 0.4）
    pub fill_opacity: f64,
    /// 枠線の幅（ピクセル、デフォルト: 2）
    pub weight: u32,
}

impl Default for AreaStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            fill_color: "lightblue".to_string(),
            fill_opacity: 0.4,
            weight: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub name: String,
    pub description: Option<String>,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: String,
    pub points: CoordinateList,
    pub style: LineStyle,
}

/// ポリゴン
///
/// `ring`は常に閉じています（先頭の点 == 末尾の点）。
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub name: String,
    pub ring: CoordinateList,
    pub style: AreaStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: LatLng,
    /// 半径（メートル）
    pub radius: f64,
    pub name: String,
    pub description: Option<String>,
    pub style: AreaStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub position: LatLng,
    pub intensity: f64,
}

/// 正規化済みの地物
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Marker(Marker),
    Line(Line),
    Polygon(Polygon),
    Circle(Circle),
    HeatPoint(HeatPoint),
}

impl Feature {
    /// 地物が属するシート種別
    pub fn kind(&self) -> SheetKind {
        match self {
            Feature::Marker(_) => SheetKind::Markers,
            Feature::Line(_) => SheetKind::Lines,
            Feature::Polygon(_) => SheetKind::Polygons,
            Feature::Circle(_) => SheetKind::Circles,
            Feature::HeatPoint(_) => SheetKind::Heatmap,
        }
    }

    /// 地図の中心計算に使う点
    ///
    /// ポリゴンの閉じ点（末尾）は先頭と重複するため含めません。
    pub fn anchor_points(&self) -> &[LatLng] {
        match self {
            Feature::Marker(m) => std::slice::from_ref(&m.position),
            Feature::Circle(c) => std::slice::from_ref(&c.center),
            Feature::HeatPoint(h) => std::slice::from_ref(&h.position),
            Feature::Line(l) => l.points.points(),
            Feature::Polygon(p) => {
                let ring = p.ring.points();
                &ring[..ring.len().saturating_sub(1)]
            }
        }
    }
}

/// シート種別に応じたビルダーで行を地物に変換する
pub(crate) fn build_feature(
    kind: SheetKind,
    record: &Record,
    closure: PolygonClosure,
) -> Result<Feature, RowError> {
    let row = RowView::new(record);
    match kind {
        SheetKind::Markers => build_marker(&row).map(Feature::Marker),
        SheetKind::Lines => build_line(&row).map(Feature::Line),
        SheetKind::Polygons => build_polygon(&row, closure).map(Feature::Polygon),
        SheetKind::Circles => build_circle(&row).map(Feature::Circle),
        SheetKind::Heatmap => build_heat_point(&row).map(Feature::HeatPoint),
    }
}

fn build_marker(row: &RowView<'_>) -> Result<Marker, RowError> {
    let position = row.required_position()?;
    let defaults = MarkerStyle::default();

    let color = row.text_or("color", &defaults.color);
    if !MARKER_COLORS.contains(&color.as_str()) {
        warn!(
            row = row.row(),
            color = %color,
            "Marker color is not in the icon palette; the icon may fall back to its default color"
        );
    }

    Ok(Marker {
        position,
        name: row.text_or("name", "Marker"),
        description: row.optional_text("description"),
        style: MarkerStyle {
            color,
            icon: row.optional_text("icon"),
        },
    })
}

fn build_line(row: &RowView<'_>) -> Result<Line, RowError> {
    let points = row.required_coordinates()?;
    require_points(&points, 2)?;
    let defaults = LineStyle::default();

    Ok(Line {
        name: row.text_or("name", "Line"),
        points,
        style: LineStyle {
            color: row.text_or("color", &defaults.color),
            weight: row.optional_u32("weight", defaults.weight)?,
            opacity: row.optional_f64_in("opacity", defaults.opacity, 0.0, 1.0, "0..=1")?,
        },
    })
}

fn build_polygon(row: &RowView<'_>, closure: PolygonClosure) -> Result<Polygon, RowError> {
    let ring = close_ring(row.required_coordinates()?, closure)?;

    Ok(Polygon {
        name: row.text_or("name", "Area"),
        ring,
        style: area_style(row)?,
    })
}

fn build_circle(row: &RowView<'_>) -> Result<Circle, RowError> {
    let center = row.required_position()?;

    Ok(Circle {
        center,
        radius: row.optional_f64_in("radius", 500.0, 0.0, f64::MAX, ">= 0")?,
        name: row.text_or("name", "Circle"),
        description: row.optional_text("description"),
        style: area_style(row)?,
    })
}

fn build_heat_point(row: &RowView<'_>) -> Result<HeatPoint, RowError> {
    let position = row.required_position()?;

    Ok(HeatPoint {
        position,
        intensity: row.optional_f64_in("intensity", 1.0, 0.0, f64::MAX, ">= 0")?,
    })
}

fn area_style(row: &RowView<'_>) -> Result<AreaStyle, RowError> {
    let defaults = AreaStyle::default();
    let color = row.optional_text("color");
    let fill_color = row
        .optional_text("fill_color")
        .or_else(|| color.clone())
        .unwrap_or(defaults.fill_color);

    Ok(AreaStyle {
        color: color.unwrap_or(defaults.color),
        fill_color,
        fill_opacity: row.optional_f64_in(
            "fill_opacity",
            defaults.fill_opacity,
            0.0,
            1.0,
            "0..=1",
        )?,
        weight: row.optional_u32("weight", defaults.weight)?,
    })
}
