//! Security Module
//!
//! 入力ファイルに対するリソース制限を定義するモジュール。
//! 巨大なファイルや異常な行数のシートによるメモリ枯渇を防ぎます。

use crate::error::MapError;

/// セキュリティ設定
///
/// ファイル処理時のリソース制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
    /// シートあたりの最大データ行数（ヘッダー行を除く）
    /// デフォルト: 1_048_576（Excelの最大行数）
    pub max_rows_per_sheet: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
            max_rows_per_sheet: 1_048_576,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズを検証する
    pub fn check_input_size(&self, bytes_read: usize) -> Result<(), MapError> {
        if bytes_read as u64 > self.max_input_file_size {
            return Err(MapError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// シートの行数を検証する
    pub fn check_row_count(&self, sheet: &str, rows: usize) -> Result<(), MapError> {
        if rows > self.max_rows_per_sheet {
            return Err(MapError::SecurityViolation(format!(
                "Sheet '{}' has too many rows: {} (max: {})",
                sheet, rows, self.max_rows_per_sheet
            )));
        }
        Ok(())
    }
}
