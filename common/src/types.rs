//! 照合処理の型定義
//!
//! - PlateString: 正規化済みナンバー
//! - EventRecord: 認識ログ1行のデコード結果
//! - DirectoryEntry: 名簿1件
//! - MatchResult: 照合結果（出力1行）

use crate::plate;
use crate::timestamp::ScanTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 正規化済みナンバー（大文字・空白/ハイフン除去済み）
///
/// 比較・類似度計算は常にこの形で行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlateString(String);

impl PlateString {
    /// 生文字列を正規化して生成する
    pub fn new(raw: &str) -> Self {
        Self(plate::normalize(raw))
    }

    /// 正規化後が空でなければ `Some`
    pub fn parse(raw: &str) -> Option<Self> {
        let plate = Self::new(raw);
        if plate.is_empty() {
            None
        } else {
            Some(plate)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 文字数（類似度計算用）
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for PlateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlateString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 認識ログ1行のデコード結果
///
/// どちらかが `None` のレコードは照合前に捨てられる。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventRecord {
    pub scan_time: Option<ScanTime>,
    pub plate: Option<PlateString>,
}

impl EventRecord {
    /// 両方のフィールドが揃っていれば確定イベントに変換
    pub fn complete(self) -> Option<DecodedEvent> {
        match (self.scan_time, self.plate) {
            (Some(scan_time), Some(plate)) => Some(DecodedEvent { scan_time, plate }),
            _ => None,
        }
    }
}

/// 照合可能なイベント（時刻・ナンバーとも確定）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub scan_time: ScanTime,
    pub plate: PlateString,
}

/// 名簿エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub plate: PlateString,
    pub room_id: String,
    /// 氏名欄の最初のカンマより前（姓）
    pub occupant_name: String,
}

/// 照合結果の種別
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchNote {
    ExactMatch,
    PossibleTypo { candidate: PlateString, score: f64 },
    NoMatch,
    NoReferenceData,
}

impl MatchNote {
    /// 出力テーブルに書くラベル
    pub fn label(&self) -> String {
        match self {
            MatchNote::ExactMatch => "ExactMatch".to_string(),
            MatchNote::PossibleTypo { candidate, .. } => format!("PossibleTypo ({})", candidate),
            MatchNote::NoMatch => "NoMatch".to_string(),
            MatchNote::NoReferenceData => "NoReferenceData".to_string(),
        }
    }
}

impl fmt::Display for MatchNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// 照合結果（1イベントにつき1件、生成後は変更しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub scan_time: ScanTime,
    pub plate: PlateString,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub occupant_name: String,
    pub note: MatchNote,
}

impl MatchResult {
    /// 出力テーブルの1行に変換
    pub fn to_row(&self) -> OutputRow {
        OutputRow {
            scan_time: self.scan_time.display(),
            room_id: self.room_id.clone(),
            last_name: self.occupant_name.clone(),
            plate: self.plate.to_string(),
            note: self.note.label(),
        }
    }
}

/// 出力テーブルの列
pub const OUTPUT_COLUMNS: [&str; 5] = ["scan_time", "room_id", "last_name", "plate", "note"];

/// 出力テーブルの1行（すべて文字列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub scan_time: String,
    pub room_id: String,
    pub last_name: String,
    pub plate: String,
    pub note: String,
}

impl OutputRow {
    /// `OUTPUT_COLUMNS` と同じ順序のフィールド
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.scan_time,
            &self.room_id,
            &self.last_name,
            &self.plate,
            &self.note,
        ]
    }
}
