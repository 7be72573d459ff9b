//! ナンバーの正規化
//!
//! 空白・ハイフン類を除去して大文字化する。
//! 空文字列も受け付ける（空の結果を弾くのは呼び出し側）。

use regex::Regex;

lazy_static::lazy_static! {
    // 全角ハイフン・Unicodeハイフンも対象
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\s\-\u{2010}\u{2011}\u{FF0D}]+").unwrap();
}

/// 生のナンバー文字列を正規形に変換
pub fn normalize(raw: &str) -> String {
    SEPARATOR_RE.replace_all(raw, "").to_uppercase()
}
