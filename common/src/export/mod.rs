//! 出力テーブル生成（共通ライブラリ）

pub mod csv_core;
#[cfg(feature = "excel")]
pub mod excel_core;

pub use csv_core::{plates_to_csv, results_to_csv};
#[cfg(feature = "excel")]
pub use excel_core::generate_excel_buffer;
