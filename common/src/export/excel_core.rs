//! Excel生成（共通ライブラリ）
//!
//! 出力テーブルと同じ列構成で1シートを作る。

use crate::error::{Error, Result};
use crate::types::{MatchResult, OUTPUT_COLUMNS};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};

/// 列幅（文字数）
const COLUMN_WIDTHS: [f64; 5] = [24.0, 10.0, 18.0, 14.0, 28.0];

/// Excelをバッファに生成
///
/// # Arguments
/// * `results` - 照合結果
/// * `sheet_name` - シート名（31文字以内）
pub fn generate_excel_buffer(results: &[MatchResult], sheet_name: &str) -> Result<Vec<u8>> {
    build_workbook(results, sheet_name).map_err(|e| Error::Export(e.to_string()))
}

fn build_workbook(results: &[MatchResult], sheet_name: &str) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *name, &header)?;
        worksheet.set_column_width(col, COLUMN_WIDTHS[col as usize])?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, result) in results.iter().enumerate() {
        let row_num = (index + 1) as u32;
        let row = result.to_row();
        for (col, value) in row.fields().iter().enumerate() {
            worksheet.write_string(row_num, col as u16, *value)?;
        }
    }

    workbook.save_to_buffer()
}
