//! JSON出力
//!
//! 表の列に加えて誤認識候補のスコアと実行統計を含める。

use crate::error::Result;
use plate_recon_common::{DateCount, MatchNote, MatchResult, ReconciliationReport, RunStats};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRow {
    scan_time: String,
    room_id: String,
    last_name: String,
    plate: String,
    note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

impl From<&MatchResult> for JsonRow {
    fn from(result: &MatchResult) -> Self {
        let row = result.to_row();
        let (candidate, score) = match &result.note {
            MatchNote::PossibleTypo { candidate, score } => (Some(candidate.to_string()), Some(*score)),
            _ => (None, None),
        };
        Self {
            scan_time: row.scan_time,
            room_id: row.room_id,
            last_name: row.last_name,
            plate: row.plate,
            note: row.note,
            candidate,
            score,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPayload<'a> {
    stats: &'a RunStats,
    dates: &'a [DateCount],
    #[serde(skip_serializing_if = "Option::is_none")]
    directory_error: Option<&'a str>,
    results: Vec<JsonRow>,
}

pub fn report_to_json(report: &ReconciliationReport) -> Result<String> {
    let payload = JsonPayload {
        stats: &report.stats,
        dates: &report.dates,
        directory_error: report.directory_error.as_deref(),
        results: report.results.iter().map(JsonRow::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn write_report(report: &ReconciliationReport, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, report_to_json(report)?)?;
    Ok(())
}
