//! Workbook Reader
//!
//! calamineのラッパーとして、シートの列挙と行データの抽出を提供します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};

use crate::api::SheetKind;
use crate::error::MapError;
use crate::security::SecurityConfig;
use crate::types::{format_number, CellValue, Record};

/// ワークブックリーダー
///
/// xlsx / xlsm / xlsb / xls / ods をcalamineの自動判定で開きます。
pub(crate) struct WorkbookReader<RS: Read + Seek + Clone> {
    /// calamineのワークブック
    workbook: Sheets<RS>,
    /// リソース制限
    security: SecurityConfig,
}

impl WorkbookReader<Cursor<Vec<u8>>> {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、サイズ制限を検証してからcalamineに渡します。
    ///
    /// # 引数
    ///
    /// * `reader` - スプレッドシートのバイト列を読み込むリーダー
    /// * `security` - リソース制限
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - ワークブックの読み込みに成功した場合
    /// * `Err(MapError::SecurityViolation)` - サイズ上限を超えた場合
    /// * `Err(MapError::Parse)` - スプレッドシートとして認識できない場合
    pub fn open<R: Read>(reader: R, security: SecurityConfig) -> Result<Self, MapError> {
        // 上限+1バイトまでしか読まない
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(security.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;
        security.check_input_size(bytes_read)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;

        Ok(Self { workbook, security })
    }
}

impl<RS: Read + Seek + Clone> WorkbookReader<RS> {
    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// 認識可能なシート種別の一覧（描画順）
    pub fn recognized_sheets(&self) -> Vec<SheetKind> {
        let names = self.sheet_names();
        SheetKind::ALL
            .into_iter()
            .filter(|kind| names.iter().any(|name| name == kind.sheet_name()))
            .collect()
    }

    /// シートを読み込み、データ行を返す
    ///
    /// 先頭行をヘッダー行として扱い、列名は前後の空白を除去します。
    /// すべてのセルが空の行は無視されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(records))` - シートが存在する場合（データ行が0件の場合も含む）
    /// * `Ok(None)` - シートが存在しない場合
    /// * `Err(MapError)` - シートの読み込みに失敗した、または行数上限を超えた場合
    pub fn read_sheet(&mut self, kind: SheetKind) -> Result<Option<Vec<Record>>, MapError> {
        let name = kind.sheet_name();
        if !self.sheet_names().iter().any(|n| n == name) {
            debug!(sheet = name, "Sheet not present");
            return Ok(None);
        }

        let range = self.workbook.worksheet_range(name)?;

        // calamineの範囲は最初の非空セルから始まる
        let first_row = range.start().map(|(row, _)| row).unwrap_or(0);
        let mut rows = range.rows();

        let Some(header) = rows.next() else {
            return Ok(Some(Vec::new()));
        };

        self.security
            .check_row_count(name, range.height().saturating_sub(1))?;

        let columns = header_columns(name, header);

        let mut records = Vec::new();
        for (offset, row) in rows.enumerate() {
            // 1始まり、ヘッダー行の次の行から
            let mut record = Record::new(first_row + offset as u32 + 2);

            for (cell, column) in row.iter().zip(columns.iter()) {
                if let Some(column) = column {
                    record.cells.insert(column.clone(), convert_cell(cell));
                }
            }

            if record.is_blank() {
                continue;
            }
            records.push(record);
        }

        Ok(Some(records))
    }
}

/// ヘッダー行から列名を取得する
///
/// 空のヘッダーと重複したヘッダーは`None`になり、その列は読み込まれません。
fn header_columns(sheet: &str, header: &[Data]) -> Vec<Option<String>> {
    let mut seen: Vec<String> = Vec::new();

    header
        .iter()
        .map(|cell| {
            let name = match convert_cell(cell) {
                CellValue::String(s) => s.trim().to_string(),
                CellValue::Number(n) => format_number(n),
                _ => return None,
            };
            if name.is_empty() {
                return None;
            }
            if seen.contains(&name) {
                warn!(sheet, column = %name, "Duplicate column header; keeping the first one");
                return None;
            }
            seen.push(name.clone());
            Some(name)
        })
        .collect()
}

/// calamineのセルを内部表現に変換する
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日付はシリアル値として扱う
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Empty => CellValue::Empty,
    }
}


// ワークブック全体の読み込みは統合テスト（tests/）で検証します。
