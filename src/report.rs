//! 端末表示
//!
//! 選択中の行は呼び出し側が保持する値（1始まりの行番号）として受け取る。
//! ここでは状態を持たず、文字列を組み立てるだけ。

use plate_recon_common::timestamp::format_date_key;
use plate_recon_common::{DateCount, MatchNote, MatchResult, RunStats, OUTPUT_COLUMNS};

/// 照合結果を表形式に整形
///
/// # Arguments
/// * `results` - 照合結果
/// * `selected` - 強調する行番号（1始まり）
pub fn render_table(results: &[MatchResult], selected: Option<usize>) -> String {
    if results.is_empty() {
        return "（該当するエントリはありません）\n".to_string();
    }

    let rows: Vec<[String; 5]> = results
        .iter()
        .map(|r| {
            let row = r.to_row();
            [row.scan_time, row.room_id, row.last_name, row.plate, row.note]
        })
        .collect();

    let mut widths: [usize; 5] = OUTPUT_COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_line("   #", &OUTPUT_COLUMNS.map(String::from), &widths));
    for (index, row) in rows.iter().enumerate() {
        let number = index + 1;
        let marker = if selected == Some(number) { '>' } else { ' ' };
        out.push_str(&format_line(&format!("{}{:>3}", marker, number), row, &widths));
    }
    out
}

fn format_line(prefix: &str, cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = prefix.to_string();
    for (cell, width) in cells.iter().zip(widths.iter()) {
        line.push_str("  ");
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(&" ".repeat(pad));
    }
    let mut line = line.trim_end().to_string();
    line.push('\n');
    line
}

/// 1件の詳細
pub fn render_detail(result: &MatchResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("  スキャン時刻: {}\n", result.scan_time.display()));
    out.push_str(&format!("  ナンバー:     {}\n", result.plate));
    match &result.note {
        MatchNote::ExactMatch => {
            out.push_str(&format!("  部屋:         {}\n", result.room_id));
            out.push_str(&format!("  姓:           {}\n", result.occupant_name));
            out.push_str("  判定:         完全一致\n");
        }
        MatchNote::PossibleTypo { candidate, score } => {
            out.push_str(&format!("  判定:         誤認識の可能性（候補 {}、類似度 {:.3}）\n", candidate, score));
        }
        MatchNote::NoMatch => out.push_str("  判定:         名簿に該当なし\n"),
        MatchNote::NoReferenceData => out.push_str("  判定:         名簿未指定\n"),
    }
    out
}

/// 選択行の詳細（範囲外なら `None`）
pub fn render_selection(results: &[MatchResult], selected: usize) -> Option<String> {
    selected
        .checked_sub(1)
        .and_then(|i| results.get(i))
        .map(render_detail)
}

/// 実行統計の要約
pub fn render_summary(stats: &RunStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  入力 {}行 / 破棄 {}行（時刻不正 {}、ナンバー不正 {}）/ 日付で除外 {}件\n",
        stats.total_rows,
        stats.dropped_rows(),
        stats.dropped_bad_timestamp,
        stats.dropped_bad_plate,
        stats.filtered_out
    ));
    out.push_str(&format!(
        "  完全一致 {} / 誤認識候補 {} / 該当なし {} / 名簿なし {}\n",
        stats.exact, stats.possible_typo, stats.no_match, stats.no_reference
    ));
    out
}

/// 日付一覧
pub fn render_dates(dates: &[DateCount]) -> String {
    if dates.is_empty() {
        return "（日付を取得できるイベントはありません）\n".to_string();
    }
    dates
        .iter()
        .map(|d| format!("  {} ({}件)\n", format_date_key(d.date), d.events))
        .collect()
}
