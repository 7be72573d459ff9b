//! CSVテキスト生成

use crate::delimited::format_line;
use crate::pipeline::PLATE_TEXT_COLUMN;
use crate::types::{MatchResult, OUTPUT_COLUMNS};

/// 照合結果をヘッダー付きCSVに変換
pub fn results_to_csv(results: &[MatchResult]) -> String {
    let mut out = format_line(&OUTPUT_COLUMNS);
    for result in results {
        let row = result.to_row();
        out.push_str(&format_line(&row.fields()));
    }
    out
}

/// ナンバー一覧を1列のCSVに変換
pub fn plates_to_csv(plates: &[String]) -> String {
    let mut out = format_line(&[PLATE_TEXT_COLUMN]);
    for plate in plates {
        out.push_str(&format_line(&[plate.as_str()]));
    }
    out
}
