//! 認識ログ行のパーサー
//!
//! 先頭列をエポックミリ秒、最終列を埋め込みJSONとして解釈し、
//! `licensePlateResult.plateText` からナンバーを取り出す。
//! 失敗はすべて `None` として表現し、エラーは返さない。

use crate::timestamp;
use crate::types::{EventRecord, PlateString};
use serde_json::Value;

/// 埋め込みJSON内のナンバー位置
pub const PLATE_TEXT_POINTER: &str = "/licensePlateResult/plateText";

/// 1行をデコード
///
/// # Arguments
/// * `row` - 列の並び（ヘッダーなし）
///
/// # Returns
/// 時刻・ナンバーのどちらか（または両方）が欠けた `EventRecord` もあり得る
pub fn parse_event_row<S: AsRef<str>>(row: &[S]) -> EventRecord {
    let scan_time = row.first().and_then(|f| timestamp::decode_str(f.as_ref()));
    let plate = row.last().and_then(|f| parse_plate(f.as_ref()));
    EventRecord { scan_time, plate }
}

/// 埋め込みJSONからナンバー文字列（正規化前）を取り出す
pub fn extract_plate_text(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload.trim()).ok()?;
    value
        .pointer(PLATE_TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// 埋め込みJSONから正規化済みナンバーを取り出す（空なら `None`）
pub fn parse_plate(payload: &str) -> Option<PlateString> {
    extract_plate_text(payload).and_then(|text| PlateString::parse(&text))
}
