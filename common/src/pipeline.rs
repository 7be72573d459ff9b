//! 照合パイプライン
//!
//! ## 処理フロー
//! 1. 各行を `EventRecord` にデコード（時刻・ナンバー欠落行は黙って捨てる）
//! 2. 名簿を構築（なければ空の名簿）
//! 3. 日付キーで絞り込み
//! 4. 入力順のまま1件ずつ照合

use crate::directory::{DirectoryLayout, ReferenceDirectory};
use crate::error::{Error, Result};
use crate::matcher::{MatchEngine, MatchOptions};
use crate::parser;
use crate::timestamp::{self, ScanTime};
use crate::types::{DecodedEvent, MatchNote, MatchResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 日付フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    On(NaiveDate),
}

impl DateFilter {
    pub fn matches(&self, time: &ScanTime) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::On(date) => time.date_key() == *date,
        }
    }
}

impl FromStr for DateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(DateFilter::All);
        }
        NaiveDate::parse_from_str(s, timestamp::DATE_KEY_FORMAT)
            .map(DateFilter::On)
            .map_err(|_| Error::Parse(format!("date must be \"All\" or YYYY-MM-DD, got \"{}\"", s)))
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => write!(f, "All"),
            DateFilter::On(date) => write!(f, "{}", timestamp::format_date_key(*date)),
        }
    }
}

/// パイプラインオプション
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub date: DateFilter,
    pub matching: MatchOptions,
}

/// 日付キーごとのイベント数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub events: usize,
}

/// 実行統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// 入力行数
    pub total_rows: usize,
    /// 時刻をデコードできなかった行
    pub dropped_bad_timestamp: usize,
    /// ナンバーを取り出せなかった行（時刻は正常）
    pub dropped_bad_plate: usize,
    /// デコードできたイベント数
    pub events: usize,
    /// 日付フィルタで除外したイベント数
    pub filtered_out: usize,
    pub exact: usize,
    pub possible_typo: usize,
    pub no_match: usize,
    pub no_reference: usize,
}

impl RunStats {
    fn count(&mut self, note: &MatchNote) {
        match note {
            MatchNote::ExactMatch => self.exact += 1,
            MatchNote::PossibleTypo { .. } => self.possible_typo += 1,
            MatchNote::NoMatch => self.no_match += 1,
            MatchNote::NoReferenceData => self.no_reference += 1,
        }
    }

    /// 捨てた行の合計
    pub fn dropped_rows(&self) -> usize {
        self.dropped_bad_timestamp + self.dropped_bad_plate
    }
}

/// 照合結果一式
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    /// 入力順の照合結果（空でも正常）
    pub results: Vec<MatchResult>,
    pub stats: RunStats,
    /// フィルタ前に観測した日付キー
    pub dates: Vec<DateCount>,
    /// 名簿ドキュメントが使えなかった場合の理由
    pub directory_error: Option<String>,
}

/// 全行をデコードし、照合可能なイベントだけを返す
pub fn decode_rows(rows: &[Vec<String>]) -> (Vec<DecodedEvent>, RunStats) {
    let mut stats = RunStats {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut events = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let record = parser::parse_event_row(row.as_slice());
        if record.scan_time.is_none() {
            stats.dropped_bad_timestamp += 1;
            tracing::debug!(row = index, "行を破棄（時刻を解釈できません）");
            continue;
        }
        match record.complete() {
            Some(event) => events.push(event),
            None => {
                stats.dropped_bad_plate += 1;
                tracing::debug!(row = index, "行を破棄（ナンバーを取り出せません）");
            }
        }
    }

    stats.events = events.len();
    (events, stats)
}

/// 観測した日付キーと件数（昇順）
pub fn available_dates(events: &[DecodedEvent]) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.scan_time.date_key()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, events)| DateCount { date, events })
        .collect()
}

/// デコード済みイベント列を照合
pub fn reconcile_events(
    events: &[DecodedEvent],
    directory: &ReferenceDirectory,
    options: &PipelineOptions,
) -> (Vec<MatchResult>, RunStats) {
    let engine = MatchEngine::new(directory, options.matching);
    let mut stats = RunStats::default();

    let results: Vec<MatchResult> = events
        .iter()
        .filter(|event| {
            let keep = options.date.matches(&event.scan_time);
            if !keep {
                stats.filtered_out += 1;
            }
            keep
        })
        .map(|event| engine.resolve(event))
        .collect();

    for result in &results {
        stats.count(&result.note);
    }

    (results, stats)
}

/// 行列と構築済み名簿から照合
pub fn reconcile(
    rows: &[Vec<String>],
    directory: Option<&ReferenceDirectory>,
    options: &PipelineOptions,
) -> ReconciliationReport {
    let empty = ReferenceDirectory::empty();
    let directory = directory.unwrap_or(&empty);

    let (events, decode_stats) = decode_rows(rows);
    let dates = available_dates(&events);
    let (results, match_stats) = reconcile_events(&events, directory, options);

    let stats = RunStats {
        total_rows: decode_stats.total_rows,
        dropped_bad_timestamp: decode_stats.dropped_bad_timestamp,
        dropped_bad_plate: decode_stats.dropped_bad_plate,
        events: decode_stats.events,
        ..match_stats
    };

    tracing::info!(
        rows = stats.total_rows,
        dropped = stats.dropped_rows(),
        results = results.len(),
        date = %options.date,
        "照合完了"
    );

    ReconciliationReport {
        results,
        stats,
        dates,
        directory_error: None,
    }
}

/// 名簿XML（任意）から照合
///
/// XMLが整形式でない場合は名簿なしとして続行し、理由を `directory_error` に残す。
pub fn reconcile_with_document(
    rows: &[Vec<String>],
    document: Option<&str>,
    layout: &DirectoryLayout,
    options: &PipelineOptions,
) -> ReconciliationReport {
    let (directory, directory_error) = match document.map(|doc| ReferenceDirectory::from_xml(doc, layout)) {
        None => (None, None),
        Some(Ok(directory)) => (Some(directory), None),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "名簿を使用できません。名簿なしで照合します");
            (None, Some(e.to_string()))
        }
    };

    let mut report = reconcile(rows, directory.as_ref(), options);
    report.directory_error = directory_error;
    report
}

/// 行列・名簿XML・日付から照合結果の並びを返す
pub fn run(rows: &[Vec<String>], document: Option<&str>, selected_date: DateFilter) -> Vec<MatchResult> {
    let options = PipelineOptions {
        date: selected_date,
        ..Default::default()
    };
    reconcile_with_document(rows, document, &DirectoryLayout::default(), &options).results
}

/// ナンバー一覧の列名
pub const PLATE_TEXT_COLUMN: &str = "plateText";

/// ナンバーを入力順に列挙
///
/// 先頭行に `plateText` 列があればその列の値を加工せずに返す。
/// なければ最終列の埋め込みJSONから正規化済みナンバーを取り出す（時刻は問わない）。
/// どちらも見つからなければ `Error::Parse`。
pub fn extract_plates(rows: &[Vec<String>]) -> Result<Vec<String>> {
    if let Some(column) = rows
        .first()
        .and_then(|header| header.iter().position(|name| name == PLATE_TEXT_COLUMN))
    {
        tracing::debug!(column, "plateText 列から抽出");
        return Ok(rows[1..]
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or_default())
            .collect());
    }

    let plates: Vec<String> = rows
        .iter()
        .filter_map(|row| row.last().and_then(|f| parser::parse_plate(f)))
        .map(|plate| plate.to_string())
        .collect();

    if plates.is_empty() {
        return Err(Error::Parse(format!(
            "input does not contain a '{}' column or any plate payload",
            PLATE_TEXT_COLUMN
        )));
    }
    Ok(plates)
}
