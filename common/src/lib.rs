//! Plate Recon Common Library
//!
//! ナンバー認識ログと部屋名簿の照合コア。入出力（ファイル・画面）は持たない。

pub mod types;
pub mod error;
pub mod plate;
pub mod timestamp;
pub mod parser;
pub mod delimited;
pub mod similarity;
pub mod directory;
pub mod matcher;
pub mod pipeline;
pub mod export;

pub use types::{DecodedEvent, DirectoryEntry, EventRecord, MatchNote, MatchResult, OutputRow, PlateString, OUTPUT_COLUMNS};
pub use error::{Error, Result};
pub use timestamp::ScanTime;
pub use parser::parse_event_row;
pub use directory::{DirectoryLayout, DirectoryStats, ReferenceDirectory};
pub use matcher::{MatchEngine, MatchOptions, DEFAULT_SIMILARITY_THRESHOLD};
pub use pipeline::{DateCount, DateFilter, PipelineOptions, ReconciliationReport, RunStats};
