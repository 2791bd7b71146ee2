//! Coordinate Parser Module
//!
//! `coordinates`列の文字列を座標列に変換するモジュール。
//!
//! 2つの表記を受け付けます。
//!
//! - JSON形式: `[[lat1, lon1], [lat2, lon2]]`
//! - 区切り形式: `lat1,lon1;lat2,lon2`
//!
//! JSON形式を先に試行し、失敗した場合に区切り形式を試行します。

use crate::api::PolygonClosure;
use crate::error::CoordinateError;
use crate::types::{CoordinateList, LatLng};

/// 座標文字列を解析する
///
/// 同じ点を表すJSON形式と区切り形式は、同一の結果になります。
///
/// # 戻り値
///
/// * `Ok(CoordinateList)` - 1点以上の座標列（すべて範囲内）
/// * `Err(CoordinateError)` - 空文字列、どちらの形式でも解析できない、範囲外の点を含む場合
///
/// # 使用例
///
/// ```rust
/// use xlsxmap::parse_coordinates;
///
/// let json = parse_coordinates("[[35.68, 139.76], [34.69, 135.50]]").unwrap();
/// let delimited = parse_coordinates("35.68,139.76;34.69,135.50").unwrap();
/// assert_eq!(json, delimited);
/// ```
pub fn parse_coordinates(input: &str) -> Result<CoordinateList, CoordinateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty);
    }

    let pairs = match parse_json_pairs(trimmed) {
        Ok(pairs) => pairs,
        Err(json_err) => parse_delimited_pairs(trimmed).map_err(|delimited_err| {
            CoordinateError::Malformed {
                json: json_err,
                delimited: delimited_err,
            }
        })?,
    };

    if pairs.is_empty() {
        return Err(CoordinateError::TooFewPoints { min: 1, found: 0 });
    }

    let mut points = Vec::with_capacity(pairs.len());
    for (index, (lat, lon)) in pairs.into_iter().enumerate() {
        let point = LatLng::new(lat, lon);
        if !point.is_valid() {
            return Err(CoordinateError::OutOfRange { index, lat, lon });
        }
        points.push(point);
    }

    Ok(CoordinateList::new(points))
}

/// 最低点数を検証する
pub(crate) fn require_points(list: &CoordinateList, min: usize) -> Result<(), CoordinateError> {
    if list.len() < min {
        return Err(CoordinateError::TooFewPoints {
            min,
            found: list.len(),
        });
    }
    Ok(())
}

/// ポリゴンのリングを検証し、ポリシーに従って閉じる
///
/// 戻り値のリングは必ず先頭と末尾が一致します。
pub(crate) fn close_ring(
    mut ring: CoordinateList,
    policy: PolygonClosure,
) -> Result<CoordinateList, CoordinateError> {
    require_points(&ring, 2)?;

    if !ring.is_closed() {
        match policy {
            PolygonClosure::AutoClose => ring.close(),
            PolygonClosure::Reject => return Err(CoordinateError::OpenRing),
        }
    }

    Ok(ring)
}

fn parse_json_pairs(input: &str) -> Result<Vec<(f64, f64)>, String> {
    serde_json::from_str::<Vec<(f64, f64)>>(input).map_err(|e| e.to_string())
}

fn parse_delimited_pairs(input: &str) -> Result<Vec<(f64, f64)>, String> {
    let mut pairs = Vec::new();

    for segment in input.split(';').map(str::trim) {
        // 末尾の`;`などによる空セグメントは無視
        if segment.is_empty() {
            continue;
        }

        let values: Vec<&str> = segment.split(',').map(str::trim).collect();
        if values.len() != 2 {
            return Err(format!(
                "pair '{}' must have exactly two comma-separated values",
                segment
            ));
        }

        let lat = parse_component(values[0], segment)?;
        let lon = parse_component(values[1], segment)?;
        pairs.push((lat, lon));
    }

    Ok(pairs)
}

fn parse_component(value: &str, segment: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("'{}' in pair '{}' is not a number", value, segment))
}
