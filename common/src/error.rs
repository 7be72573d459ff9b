//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 行単位・レコード単位の失敗はここに現れない（呼び出し側で件数として集計される）。
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 参照ドキュメント自体が整形式でない
    #[error("Structure error: {0}")]
    Structure(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
