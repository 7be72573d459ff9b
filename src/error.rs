use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlateReconError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("認識ログ（.csv / .xlsx）が見つかりません: {0}")]
    NoEventFiles(String),

    #[error("未対応の入力形式です: {0}（.csv または .xlsx を指定してください）")]
    UnsupportedInput(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("出力エラー: {0}")]
    Export(String),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] plate_recon_common::Error),
}

pub type Result<T> = std::result::Result<T, PlateReconError>;
