//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;
use std::collections::HashMap;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列も空として扱います。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得（書式適用前）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// 数値を文字列化する（整数値は小数点なし）
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// スプレッドシートの1行
///
/// ヘッダー行の列名をキーとするセルの集合です。正規化前のため型は未確定です。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    /// シート上の行番号（1始まり、ヘッダー行を含む）
    pub row: u32,

    /// 列名 → セル値
    pub cells: HashMap<String, CellValue>,
}

impl Record {
    pub fn new(row: u32) -> Self {
        Self {
            row,
            cells: HashMap::new(),
        }
    }

    /// 空でないセルを取得する
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column).filter(|value| !value.is_blank())
    }

    /// すべてのセルが空かどうか
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

/// 緯度・経度のペア（WGS84）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// 緯度が[-90, 90]、経度が[-180, 180]の範囲内か
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Leaflet形式の`[lat, lon]`
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// 順序付きの座標列
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateList(Vec<LatLng>);

impl CoordinateList {
    pub fn new(points: Vec<LatLng>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[LatLng] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 先頭と末尾の点が一致しているか（1点以上の場合）
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// 先頭の点を末尾に追加してリングを閉じる（既に閉じている場合は何もしない）
    pub fn close(&mut self) {
        if let Some(first) = self.0.first().copied() {
            if !self.is_closed() {
                self.0.push(first);
            }
        }
    }

    /// Leaflet形式の`[[lat, lon], ...]`
    pub fn to_arrays(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|p| p.to_array()).collect()
    }

    /// GeoJSON形式の`[[lon, lat], ...]`
    pub fn to_lon_lat(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|p| [p.lon, p.lat]).collect()
    }
}

/// 地図全体の外接矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// 1点からなる矩形
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south: point.lat,
            west: point.lon,
            north: point.lat,
            east: point.lon,
        }
    }

    /// 点を含むように矩形を拡張する
    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
    }

    /// Leaflet形式の`[[south, west], [north, east]]`
    pub fn to_corners(self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}
