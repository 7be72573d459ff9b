//! エポックミリ秒のデコード
//!
//! 常にUTCで解釈する（ローカルタイムゾーンは使わない）。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 出力用の表示形式
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// 日付キーの形式
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// スキャン時刻（UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanTime(DateTime<Utc>);

impl ScanTime {
    /// エポックミリ秒から生成（表現範囲外なら `None`）
    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(Self)
    }

    /// 日付キー（時刻を除いた暦日）
    pub fn date_key(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// `YYYY-MM-DD HH:MM:SS UTC`
    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for ScanTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

/// エポックミリ秒をデコード
pub fn decode(ms: i64) -> Option<ScanTime> {
    ScanTime::from_millis(ms)
}

/// 文字列のエポックミリ秒をデコード
///
/// 前後の空白は許容する。整数でなければ `None`。
pub fn decode_str(raw: &str) -> Option<ScanTime> {
    raw.trim().parse::<i64>().ok().and_then(decode)
}

/// 日付キーを文字列化
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}
