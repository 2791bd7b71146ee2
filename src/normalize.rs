//! Row Normalizer Module
//!
//! 型の確定していない[`Record`]から、列ごとに値を取り出して型変換するモジュール。
//!
//! - 必須列が空 → `RowError::MissingField`
//! - 数値変換の失敗 → `RowError::InvalidNumber`
//! - 任意列が空 → 呼び出し側が指定したデフォルト値

use crate::coords::parse_coordinates;
use crate::error::RowError;
use crate::types::{format_number, CellValue, CoordinateList, LatLng, Record};

/// 1行分の列アクセサ
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowView<'a> {
    record: &'a Record,
}

impl<'a> RowView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// シート上の行番号
    pub fn row(&self) -> u32 {
        self.record.row
    }

    /// 必須の数値列
    pub fn required_f64(&self, column: &'static str) -> Result<f64, RowError> {
        match self.record.get(column) {
            Some(value) => coerce_f64(column, value),
            None => Err(RowError::MissingField { column }),
        }
    }

    /// 任意の数値列（空ならデフォルト値）
    pub fn optional_f64(&self, column: &'static str, default: f64) -> Result<f64, RowError> {
        match self.record.get(column) {
            Some(value) => coerce_f64(column, value),
            None => Ok(default),
        }
    }

    /// 任意の数値列（範囲チェック付き）
    pub fn optional_f64_in(
        &self,
        column: &'static str,
        default: f64,
        min: f64,
        max: f64,
        expected: &'static str,
    ) -> Result<f64, RowError> {
        let value = self.optional_f64(column, default)?;
        if !(min..=max).contains(&value) {
            return Err(RowError::OutOfRange {
                column,
                value,
                expected,
            });
        }
        Ok(value)
    }

    /// 任意の整数列（0以上の整数のみ）
    pub fn optional_u32(&self, column: &'static str, default: u32) -> Result<u32, RowError> {
        let Some(value) = self.record.get(column) else {
            return Ok(default);
        };

        let number = coerce_f64(column, value)?;
        if number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
            return Err(RowError::InvalidNumber {
                column,
                value: value.as_raw_string(),
            });
        }
        Ok(number as u32)
    }

    /// 任意の文字列列（前後の空白は除去）
    ///
    /// エラー値のセルは空として扱います。
    pub fn optional_text(&self, column: &'static str) -> Option<String> {
        match self.record.get(column)? {
            CellValue::Error(_) => None,
            CellValue::String(s) => Some(s.trim().to_string()),
            other => Some(other.as_raw_string()),
        }
    }

    /// 任意の文字列列（空ならデフォルト値）
    pub fn text_or(&self, column: &'static str, default: &str) -> String {
        self.optional_text(column).unwrap_or_else(|| default.to_string())
    }

    /// 必須の`latitude`/`longitude`列
    pub fn required_position(&self) -> Result<LatLng, RowError> {
        let lat = self.required_f64("latitude")?;
        let lon = self.required_f64("longitude")?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(RowError::OutOfRange {
                column: "latitude",
                value: lat,
                expected: "-90..=90",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RowError::OutOfRange {
                column: "longitude",
                value: lon,
                expected: "-180..=180",
            });
        }

        Ok(LatLng::new(lat, lon))
    }

    /// 必須の`coordinates`列
    ///
    /// 数値セルなど文字列以外の値は、文字列化してから解析します。
    pub fn required_coordinates(&self) -> Result<CoordinateList, RowError> {
        let value = self
            .record
            .get("coordinates")
            .ok_or(RowError::MissingField {
                column: "coordinates",
            })?;

        Ok(parse_coordinates(&value.as_raw_string())?)
    }
}

fn coerce_f64(column: &'static str, value: &CellValue) -> Result<f64, RowError> {
    let number = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::String(s) => s.trim().parse::<f64>().ok(),
        CellValue::Bool(_) | CellValue::Error(_) | CellValue::Empty => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        Some(n) => Err(RowError::InvalidNumber {
            column,
            value: format_number(n),
        }),
        None => Err(RowError::InvalidNumber {
            column,
            value: value.as_raw_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoordinateError;

    fn record(cells: &[(&str, CellValue)]) -> Record {
        let mut record = Record::new(2);
        for (name, value) in cells {
            record.cells.insert(name.to_string(), value.clone());
        }
        record
    }

    fn s(value: &str) -> CellValue {
        CellValue::String(value.to_string())
    }

    #[test]
    fn test_required_f64_from_number_and_string() {
        let rec = record(&[("latitude", CellValue::Number(1.5)), ("longitude", s(" -2.25 "))]);
        let view = RowView::new(&rec);
        assert_eq!(view.required_f64("latitude"), Ok(1.5));
        assert_eq!(view.required_f64("longitude"), Ok(-2.25));
    }

    #[test]
    fn test_required_f64_missing() {
        let rec = record(&[("latitude", CellValue::Empty)]);
        let view = RowView::new(&rec);
        assert_eq!(
            view.required_f64("latitude"),
            Err(RowError::MissingField { column: "latitude" })
        );
        assert_eq!(
            view.required_f64("longitude"),
            Err(RowError::MissingField { column: "longitude" })
        );
    }

    #[test]
    fn test_required_f64_invalid() {
        let rec = record(&[("latitude", s("north")), ("longitude", CellValue::Bool(true))]);
        let view = RowView::new(&rec);
        assert_eq!(
            view.required_f64("latitude"),
            Err(RowError::InvalidNumber {
                column: "latitude",
                value: "north".to_string()
            })
        );
        assert!(matches!(
            view.required_f64("longitude"),
            Err(RowError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_non_finite_is_invalid() {
        let rec = record(&[("radius", s("inf"))]);
        let view = RowView::new(&rec);
        assert!(matches!(
            view.optional_f64("radius", 500.0),
            Err(RowError::InvalidNumber { column: "radius", .. })
        ));
    }

    #[test]
    fn test_optional_defaults() {
        let rec = record(&[]);
        let view = RowView::new(&rec);
        assert_eq!(view.optional_f64("opacity", 0.8), Ok(0.8));
        assert_eq!(view.optional_u32("weight", 3), Ok(3));
        assert_eq!(view.text_or("color", "blue"), "blue");
        assert_eq!(view.optional_text("description"), None);
    }

    #[test]
    fn test_optional_u32() {
        let rec = record(&[
            ("weight", CellValue::Number(5.0)),
            ("bad", CellValue::Number(2.5)),
            ("negative", s("-1")),
        ]);
        let view = RowView::new(&rec);
        assert_eq!(view.optional_u32("weight", 3), Ok(5));
        assert!(view.optional_u32("bad", 3).is_err());
        assert!(view.optional_u32("negative", 3).is_err());
    }

    #[test]
    fn test_optional_f64_in_range() {
        let rec = record(&[("opacity", CellValue::Number(1.5))]);
        let view = RowView::new(&rec);
        assert_eq!(
            view.optional_f64_in("opacity", 0.8, 0.0, 1.0, "0..=1"),
            Err(RowError::OutOfRange {
                column: "opacity",
                value: 1.5,
                expected: "0..=1"
            })
        );
    }

    #[test]
    fn test_optional_text_coercion() {
        let rec = record(&[
            ("name", s("  NYC  ")),
            ("icon", CellValue::Number(7.0)),
            ("color", CellValue::Error("#N/A".to_string())),
        ]);
        let view = RowView::new(&rec);
        assert_eq!(view.optional_text("name").as_deref(), Some("NYC"));
        assert_eq!(view.optional_text("icon").as_deref(), Some("7"));
        assert_eq!(view.optional_text("color"), None);
    }

    #[test]
    fn test_required_position_range() {
        let rec = record(&[
            ("latitude", CellValue::Number(91.0)),
            ("longitude", CellValue::Number(0.0)),
        ]);
        assert!(matches!(
            RowView::new(&rec).required_position(),
            Err(RowError::OutOfRange { column: "latitude", .. })
        ));

        let rec = record(&[
            ("latitude", CellValue::Number(40.7128)),
            ("longitude", CellValue::Number(-74.006)),
        ]);
        assert_eq!(
            RowView::new(&rec).required_position(),
            Ok(LatLng::new(40.7128, -74.006))
        );
    }

    #[test]
    fn test_required_coordinates() {
        let rec = record(&[("coordinates", s("[[1,2],[3,4]]"))]);
        assert_eq!(RowView::new(&rec).required_coordinates().map(|c| c.len()), Ok(2));

        let rec = record(&[("coordinates", s("[[1,2],"))]);
        assert!(matches!(
            RowView::new(&rec).required_coordinates(),
            Err(RowError::Coordinates(CoordinateError::Malformed { .. }))
        ));

        let rec = record(&[]);
        assert_eq!(
            RowView::new(&rec).required_coordinates(),
            Err(RowError::MissingField {
                column: "coordinates"
            })
        );
    }
}
