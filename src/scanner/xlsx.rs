use crate::error::{PlateReconError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 先頭シートの全セルを文字列として読み込む
///
/// 行末の空セルは落とす（最終列を埋め込みJSONとして扱うため）。
pub fn read_sheet_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PlateReconError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| PlateReconError::Spreadsheet(e.to_string()))?,
        None => return Ok(Vec::new()),
    };

    let rows = range
        .rows()
        .filter_map(|cells| {
            let mut row: Vec<String> = cells.iter().map(cell_text).collect();
            while row.last().is_some_and(|c| c.is_empty()) {
                row.pop();
            }
            if row.is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect();

    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        // エポックミリ秒が指数表記にならないように
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
