//! Parser Module
//!
//! calamineを使用したスプレッドシート読み込みの実装。
//! 固定名のシートを列挙し、各行を[`Record`](crate::types::Record)に変換します。

mod workbook;

pub(crate) use workbook::WorkbookReader;
