//! Excel生成（CLI版）

use crate::error::Result;
use plate_recon_common::export::generate_excel_buffer;
use plate_recon_common::MatchResult;
use std::path::Path;

const SHEET_NAME: &str = "照合結果";

pub fn generate_excel(results: &[MatchResult], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(results, SHEET_NAME)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
