//! 入力ファイルの読み込み
//!
//! 認識ログは単一ファイル（.csv / .xlsx）またはそれらを直下に含むフォルダ。
//! フォルダの場合はファイル名順に行を連結する。

mod xlsx;

use crate::error::{PlateReconError, Result};
use plate_recon_common::delimited;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EVENT_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xls"];

/// 認識ログの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFileKind {
    Csv,
    Spreadsheet,
}

impl EventFileKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "csv" => Some(EventFileKind::Csv),
            "xlsx" | "xlsm" | "xls" => Some(EventFileKind::Spreadsheet),
            _ => None,
        }
    }
}

/// フォルダ直下の認識ログを列挙（ファイル名順）
pub fn scan_event_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(PlateReconError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_event_extension(path))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

fn is_event_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            EVENT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 認識ログの全行を読み込む
pub fn load_event_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    if path.is_dir() {
        let files = scan_event_files(path)?;
        if files.is_empty() {
            return Err(PlateReconError::NoEventFiles(path.display().to_string()));
        }

        let mut rows = Vec::new();
        for file in &files {
            let file_rows = load_event_file(file)?;
            tracing::debug!(file = %file.display(), rows = file_rows.len(), "認識ログを読み込みました");
            rows.extend(file_rows);
        }
        return Ok(rows);
    }

    if !path.exists() {
        return Err(PlateReconError::FileNotFound(path.display().to_string()));
    }

    load_event_file(path)
}

fn load_event_file(path: &Path) -> Result<Vec<Vec<String>>> {
    match EventFileKind::detect(path) {
        Some(EventFileKind::Csv) => read_csv_rows(path),
        Some(EventFileKind::Spreadsheet) => xlsx::read_sheet_rows(path),
        None => Err(PlateReconError::UnsupportedInput(path.display().to_string())),
    }
}

/// CSVファイルを行に分割（UTF-8として読めない部分は置換）
pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(delimited::parse_records(&content))
}

/// 名簿XMLをテキストとして読み込む
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PlateReconError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
