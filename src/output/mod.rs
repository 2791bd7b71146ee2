//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod assets;
mod formatters;

use crate::assemble::MapDocument;
use crate::error::MapError;
use std::io::Write;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（HTML, GeoJSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Html,
    GeoJson,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Html => OutputFormatter::Html,
            crate::api::OutputFormat::GeoJson => OutputFormatter::GeoJson,
        }
    }

    /// 地図を指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `document` - 組み立て済みの地図
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(MapError)` - エラーが発生した場合
    pub fn render<W: Write>(&self, document: &MapDocument, writer: &mut W) -> Result<(), MapError> {
        match self {
            OutputFormatter::Html => HtmlFormatter.render(document, writer),
            OutputFormatter::GeoJson => GeoJsonFormatter.render(document, writer),
        }
    }
}
