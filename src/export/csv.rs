//! CSV出力（CLI版）

use crate::error::Result;
use plate_recon_common::export::{plates_to_csv, results_to_csv};
use plate_recon_common::MatchResult;
use std::path::Path;

pub fn write_results(results: &[MatchResult], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, results_to_csv(results))?;
    Ok(())
}

pub fn write_plates(plates: &[String], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, plates_to_csv(plates))?;
    Ok(())
}
