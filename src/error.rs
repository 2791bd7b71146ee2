//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! エラーは2階層に分かれます。
//!
//! - [`MapError`]: 実行全体を中断する致命的エラー（ファイル読み込み失敗など）
//! - [`RowError`]: 1行だけをスキップする行レベルのエラー（必須列の欠落など）

use thiserror::Error;

/// xlsxmapクレート全体で使用する致命的エラー型
///
/// このエラーが返された場合、地図は出力されません。
/// CLIは非ゼロの終了コードで終了します。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxmap::MapError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<File, MapError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum MapError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、出力ファイルの書き込み失敗など。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー
    ///
    /// calamineがファイル形式を認識できない、またはファイルが破損している場合です。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONシリアライズ中に発生したエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `MapBuilder::build()`時に設定を検証し、無効な設定が検出された場合に発生します。
    ///
    /// ```rust,no_run
    /// use xlsxmap::{MapBuilder, MapError};
    ///
    /// match MapBuilder::new().with_zoom(42).build() {
    ///     Err(MapError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 認識可能なシートが1つも存在しない
    ///
    /// `found`には、ワークブックに実際に存在したシート名が入ります。
    #[error(
        "No recognized sheet found (expected one of markers, lines, polygons, circles, heatmap; found: {})",
        .found.join(", ")
    )]
    NoRecognizedSheets {
        /// ワークブック内のシート名
        found: Vec<String>,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力サイズ上限やシートあたりの行数上限を超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

/// 行レベルのエラー
///
/// 該当行はスキップされ、警告ログが出力されます。処理は継続します。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    /// 必須列が存在しない、またはセルが空
    #[error("missing required column '{column}'")]
    MissingField { column: &'static str },

    /// 数値への変換に失敗
    #[error("column '{column}' is not a valid number: '{value}'")]
    InvalidNumber { column: &'static str, value: String },

    /// 数値が許容範囲外
    #[error("column '{column}' is out of range: {value} (expected {expected})")]
    OutOfRange {
        column: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// `coordinates`列の解析に失敗
    #[error("invalid coordinates: {0}")]
    Coordinates(#[from] CoordinateError),
}

/// 座標文字列の解析エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    /// 空文字列
    #[error("coordinate string is empty")]
    Empty,

    /// JSON形式・区切り形式のどちらとしても解析できない
    #[error("not a JSON pair list ({json}) nor a 'lat,lon;lat,lon' list ({delimited})")]
    Malformed { json: String, delimited: String },

    /// 緯度・経度が範囲外
    #[error("point {index} ({lat}, {lon}) is outside latitude [-90, 90] / longitude [-180, 180]")]
    OutOfRange { index: usize, lat: f64, lon: f64 },

    /// 点の数が足りない
    #[error("expected at least {min} points, found {found}")]
    TooFewPoints { min: usize, found: usize },

    /// ポリゴンのリングが閉じていない（`PolygonClosure::Reject`時のみ）
    #[error("polygon ring is not closed (first point differs from last point)")]
    OpenRing,
}
