pub mod csv;
pub mod excel;
pub mod json;

use crate::cli::OutputFormat;
use crate::error::{PlateReconError, Result};
use plate_recon_common::pipeline::PLATE_TEXT_COLUMN;
use plate_recon_common::ReconciliationReport;
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_STEM: &str = "reconciliation";

/// 出力先がディレクトリなら既定名を付ける
pub fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

/// 照合結果をファイルに出力
///
/// # Returns
/// 書き込んだファイルのパス
pub fn export_report(
    report: &ReconciliationReport,
    format: OutputFormat,
    output: &Path,
) -> Result<PathBuf> {
    let extension = format
        .extension()
        .ok_or_else(|| PlateReconError::Export(format!("{} 形式はファイルに出力できません", format)))?;

    let output_path = output_path_for_format(output, DEFAULT_STEM, extension);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Csv => csv::write_results(&report.results, &output_path)?,
        OutputFormat::Json => json::write_report(report, &output_path)?,
        OutputFormat::Excel => excel::generate_excel(&report.results, &output_path)?,
        OutputFormat::Table => unreachable!("table has no file extension"),
    }

    tracing::info!(path = %output_path.display(), format = %format, "出力しました");
    Ok(output_path)
}

/// ナンバー一覧をCSVに出力
pub fn export_plates(plates: &[String], output: &Path) -> Result<PathBuf> {
    let output_path = output_path_for_format(output, PLATE_TEXT_COLUMN, "csv");
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    csv::write_plates(plates, &output_path)?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_directory_like() {
        let path = output_path_for_format(Path::new("out"), DEFAULT_STEM, "csv");
        assert_eq!(path, PathBuf::from("out/reconciliation.csv"));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/result.xlsx"), DEFAULT_STEM, "xlsx");
        assert_eq!(path, PathBuf::from("out/result.xlsx"));
    }

    #[test]
    fn test_table_format_cannot_be_exported() {
        let report = ReconciliationReport::default();
        let result = export_report(&report, OutputFormat::Table, Path::new("."));
        assert!(matches!(result, Err(PlateReconError::Export(_))));
    }
}
