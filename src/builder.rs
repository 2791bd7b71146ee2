//! Builder Module
//!
//! Fluent Builder APIを提供し、`MapGenerator`インスタンスを段階的に構築する。

use std::io::{BufWriter, Read, Write};
use tracing::{info, warn};

use crate::api::{OutputFormat, PolygonClosure, SheetKind, TileStyle};
use crate::assemble::{MapDocument, MapOptions};
use crate::error::{MapError, RowError};
use crate::layers::build_feature;
use crate::output::OutputFormatter;
use crate::parser::WorkbookReader;
use crate::security::SecurityConfig;
use crate::types::LatLng;

/// Leafletタイルで一般的に利用できる最大ズーム
const MAX_ZOOM: u8 = 18;

/// 生成処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct MapConfig {
    /// 描画オプション
    pub options: MapOptions,

    /// ポリゴンのリングが閉じていない場合の処理
    pub polygon_closure: PolygonClosure,

    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// リソース制限
    pub security: SecurityConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            options: MapOptions::default(),
            polygon_closure: PolygonClosure::AutoClose,
            output_format: OutputFormat::Html,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `MapGenerator`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxmap::{MapBuilder, OutputFormat};
///
/// # fn main() -> Result<(), xlsxmap::MapError> {
/// let generator = MapBuilder::new()
///     .with_zoom(12)
///     .with_marker_clustering(false)
///     .with_output_format(OutputFormat::Html)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MapBuilder {
    /// 内部設定（構築中）
    config: MapConfig,
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - ズーム: 10
    /// - 中心: 全地物の平均（地物がない場合は (0, 0)）
    /// - タイル: OpenStreetMap, Light Mode, Dark Mode
    /// - マーカーのクラスタリング: 有効
    /// - 中心グロー: 有効
    /// - 表示範囲の自動調整: 無効
    /// - ポリゴン: 自動で閉じる
    /// - 出力: HTML
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
        }
    }

    /// 初期ズームレベルを指定する（0〜18）
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.config.options.zoom = zoom;
        self
    }

    /// 地図の中心を明示的に指定する
    ///
    /// 指定しない場合は、全地物の緯度・経度の平均が使われます。
    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.config.options.center = Some(LatLng::new(lat, lon));
        self
    }

    /// ベースレイヤーのタイルスタイルを指定する
    ///
    /// 先頭のスタイルが初期表示になります。2種類以上が必要です。
    ///
    /// ```rust,no_run
    /// use xlsxmap::{MapBuilder, TileStyle};
    ///
    /// let builder = MapBuilder::new()
    ///     .with_tiles(vec![TileStyle::CartoDbDarkMatter, TileStyle::OpenStreetMap]);
    /// ```
    pub fn with_tiles(mut self, tiles: Vec<TileStyle>) -> Self {
        self.config.options.tiles = tiles;
        self
    }

    /// マーカーをクラスタリングするかを指定する
    pub fn with_marker_clustering(mut self, enabled: bool) -> Self {
        self.config.options.cluster_markers = enabled;
        self
    }

    /// 中心グローマーカーを表示するかを指定する
    pub fn with_center_glow(mut self, enabled: bool) -> Self {
        self.config.options.center_glow = enabled;
        self
    }

    /// 表示範囲を全地物の外接矩形に合わせるかを指定する
    pub fn with_fit_bounds(mut self, enabled: bool) -> Self {
        self.config.options.fit_bounds = enabled;
        self
    }

    /// HTMLページのタイトルを指定する
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.options.title = title.into();
        self
    }

    /// 閉じていないポリゴンの処理方法を指定する
    pub fn with_polygon_closure(mut self, closure: PolygonClosure) -> Self {
        self.config.polygon_closure = closure;
        self
    }

    /// 出力フォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`MapGenerator`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `MapError::Config(String)`: 設定の検証に失敗した場合
    ///   * ズームレベルが18を超える
    ///   * 中心座標が範囲外
    ///   * タイルスタイルが2種類未満、または重複している
    ///   * タイトルが空
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<MapGenerator, MapError> {
        let options = &self.config.options;

        // 1. ズームレベルの検証
        if options.zoom > MAX_ZOOM {
            return Err(MapError::Config(format!(
                "Invalid zoom: {} (max: {})",
                options.zoom, MAX_ZOOM
            )));
        }

        // 2. 中心座標の検証
        if let Some(center) = options.center {
            if !center.is_valid() {
                return Err(MapError::Config(format!(
                    "Invalid center: ({}, {})",
                    center.lat, center.lon
                )));
            }
        }

        // 3. タイルスタイルの検証
        if options.tiles.len() < 2 {
            return Err(MapError::Config(format!(
                "At least two tile styles are required for the layer switcher (got {})",
                options.tiles.len()
            )));
        }
        for (i, tile) in options.tiles.iter().enumerate() {
            if options.tiles[..i].contains(tile) {
                return Err(MapError::Config(format!(
                    "Duplicate tile style: {}",
                    tile.label()
                )));
            }
        }

        // 4. その他
        if options.title.trim().is_empty() {
            return Err(MapError::Config("Title must not be empty".to_string()));
        }
        if self.config.security.max_input_file_size == 0 {
            return Err(MapError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(MapGenerator::new(self.config))
    }
}

/// スキップされた行
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub sheet: SheetKind,
    /// シート上の行番号（1始まり）
    pub row: u32,
    pub error: RowError,
}

/// 生成結果のサマリー
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// 認識されたシート（描画順）
    pub sheets: Vec<SheetKind>,
    /// 種別ごとの地物数
    pub features: Vec<(SheetKind, usize)>,
    /// スキップされた行
    pub skipped: Vec<SkippedRow>,
}

impl GenerationReport {
    /// 指定した種別の地物数
    pub fn feature_count(&self, kind: SheetKind) -> usize {
        self.features
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// 全地物数
    pub fn total_features(&self) -> usize {
        self.features.iter().map(|(_, count)| count).sum()
    }
}

/// 地図生成のファサード
///
/// スプレッドシートを読み込み、地物を組み立て、指定されたフォーマットで出力します。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::fs::File;
/// use xlsxmap::MapBuilder;
///
/// # fn main() -> Result<(), xlsxmap::MapError> {
/// let generator = MapBuilder::new().build()?;
/// let input = File::open("places.xlsx")?;
/// let output = File::create("map.html")?;
/// let report = generator.generate(input, output)?;
/// println!("{} features, {} rows skipped", report.total_features(), report.skipped.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MapGenerator {
    /// 生成設定
    config: MapConfig,
}

impl MapGenerator {
    pub(crate) fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// スプレッドシートを読み込み、地図を組み立てる
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開く（サイズ制限を検証）
    /// 2. 固定名のシートを列挙
    /// 3. 各シートの各行を地物に変換（失敗した行はスキップして警告）
    /// 4. 中心・外接矩形を計算
    ///
    /// # 戻り値
    ///
    /// * `Ok((MapDocument, GenerationReport))` - 組み立てに成功した場合
    /// * `Err(MapError::NoRecognizedSheets)` - 認識可能なシートが1つもない場合
    /// * `Err(MapError)` - 読み込みエラー
    pub fn load<R: Read>(&self, input: R) -> Result<(MapDocument, GenerationReport), MapError> {
        let mut reader = WorkbookReader::open(input, self.config.security.clone())?;

        let sheet_names = reader.sheet_names();
        info!("Found sheets: {:?}", sheet_names);

        let sheets = reader.recognized_sheets();
        if sheets.is_empty() {
            return Err(MapError::NoRecognizedSheets { found: sheet_names });
        }

        let mut report = GenerationReport {
            sheets: sheets.clone(),
            ..GenerationReport::default()
        };
        let mut features = Vec::new();

        for kind in sheets {
            let Some(records) = reader.read_sheet(kind)? else {
                continue;
            };
            info!(sheet = %kind, rows = records.len(), "Adding {}...", kind);

            let mut built = 0usize;
            for record in &records {
                match build_feature(kind, record, self.config.polygon_closure) {
                    Ok(feature) => {
                        features.push(feature);
                        built += 1;
                    }
                    Err(error) => {
                        warn!(sheet = %kind, row = record.row, "Skipping row: {}", error);
                        report.skipped.push(SkippedRow {
                            sheet: kind,
                            row: record.row,
                            error,
                        });
                    }
                }
            }
            report.features.push((kind, built));
        }

        if features.is_empty() {
            warn!("No valid rows found; the map will be empty");
        }

        let document = MapDocument::assemble(features, self.config.options.clone());
        info!(
            lat = document.center().lat,
            lon = document.center().lon,
            features = document.total_features(),
            "Map assembled"
        );

        Ok((document, report))
    }

    /// スプレッドシートを地図に変換して書き出す
    ///
    /// # 引数
    ///
    /// * `input` - スプレッドシートを読み込むためのリーダー
    /// * `output` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(GenerationReport)` - 変換に成功した場合（スキップされた行を含む）
    /// * `Err(MapError)` - 致命的なエラーが発生した場合
    pub fn generate<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<GenerationReport, MapError> {
        let (document, report) = self.load(input)?;

        let formatter = OutputFormatter::from_format(self.config.output_format);
        let mut writer = BufWriter::new(&mut output);
        formatter.render(&document, &mut writer)?;
        writer.flush()?;

        Ok(report)
    }

    /// スプレッドシートを地図に変換し、文字列として返す
    pub fn generate_to_string<R: Read>(
        &self,
        input: R,
    ) -> Result<(String, GenerationReport), MapError> {
        let mut buffer = Vec::new();
        let report = self.generate(input, &mut buffer)?;

        let result = String::from_utf8(buffer)
            .map_err(|e| MapError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        Ok((result, report))
    }
}
