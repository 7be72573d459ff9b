use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plate-recon")]
#[command(about = "ナンバー認識ログと部屋名簿の照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 認識ログを名簿と照合して出力
    Run {
        /// 認識ログ（.csv / .xlsx、またはそれらを含むフォルダ）
        #[arg(required = true)]
        events: PathBuf,

        /// 部屋名簿XML
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// 対象日（All または YYYY-MM-DD）
        #[arg(long)]
        date: Option<String>,

        /// 対象日を一覧から選択
        #[arg(long, conflicts_with = "date")]
        pick_date: bool,

        /// 誤認識候補とみなす類似度（0.0-1.0）
        #[arg(long)]
        threshold: Option<f64>,

        /// 出力形式 (csv/json/excel/table)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 詳細表示する行番号（1始まり、table形式のみ）
        #[arg(long)]
        select: Option<usize>,
    },

    /// 認識ログからナンバーだけを抽出
    Extract {
        /// 認識ログ（.csv / .xlsx、またはそれらを含むフォルダ）
        #[arg(required = true)]
        events: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 認識ログに含まれる日付を一覧表示
    Dates {
        /// 認識ログ（.csv / .xlsx、またはそれらを含むフォルダ）
        #[arg(required = true)]
        events: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 類似度の閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 既定の対象日を設定（All または YYYY-MM-DD）
        #[arg(long)]
        set_default_date: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Excel,
    /// 端末に表形式で表示
    Table,
}

impl OutputFormat {
    /// 出力ファイルの拡張子（表示のみの形式は `None`）
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Csv => Some("csv"),
            OutputFormat::Json => Some("json"),
            OutputFormat::Excel => Some("xlsx"),
            OutputFormat::Table => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "table" | "tty" => Ok(OutputFormat::Table),
            _ => Err(format!("Unknown format: {}. Use csv, json, excel, or table", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Excel => write!(f, "excel"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}
