use anyhow::Context;
use clap::Parser;
use plate_recon::{cli, config, date_selector, export, report, scanner};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use plate_recon_common::pipeline::{self, PipelineOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Run { events, directory, date, pick_date, threshold, format, output, select } => {
            println!("🚗 plate-recon - 照合\n");

            // 1. 認識ログ読み込み
            println!("[1/3] 認識ログを読み込み中...");
            let rows = scanner::load_event_rows(&events)
                .with_context(|| format!("認識ログを読み込めません: {}", events.display()))?;
            println!("✔ {}行を読み込み\n", rows.len());

            // 2. 名簿読み込み
            let document = match &directory {
                Some(path) => {
                    println!("[2/3] 名簿を読み込み中...");
                    let text = scanner::read_document(path)
                        .with_context(|| format!("名簿を読み込めません: {}", path.display()))?;
                    Some(text)
                }
                None => {
                    println!("[2/3] 名簿なし（全件 NoReferenceData）");
                    None
                }
            };

            // 3. 照合
            let date_filter = if pick_date {
                let (decoded, _) = pipeline::decode_rows(&rows);
                date_selector::select_date_interactive(&pipeline::available_dates(&decoded))?
            } else {
                config.date_filter(date.as_deref())?
            };
            let options = PipelineOptions {
                date: date_filter,
                matching: config.match_options(threshold)?,
            };

            println!("[3/3] 照合中... (対象日: {}, 閾値: {})", options.date, options.matching.similarity_threshold);
            let report = pipeline::reconcile_with_document(
                &rows,
                document.as_deref(),
                &config.directory_layout,
                &options,
            );
            if let Some(reason) = &report.directory_error {
                eprintln!("⚠ 名簿XMLが不正なため名簿なしで照合しました: {}", reason);
            }
            print!("{}", report::render_summary(&report.stats));
            println!("✔ {}件\n", report.results.len());

            let format = match format {
                Some(f) => f,
                None => config.default_format.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            };

            if format == OutputFormat::Table {
                print!("{}", report::render_table(&report.results, select));
                if let Some(selected) = select {
                    match report::render_selection(&report.results, selected) {
                        Some(detail) => println!("\n#{}\n{}", selected, detail),
                        None => eprintln!("⚠ 行番号 {} は範囲外です", selected),
                    }
                }
            } else {
                let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
                let path = export::export_report(&report, format, &output_dir)?;
                println!("✔ 出力: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Extract { events, output } => {
            println!("🔎 plate-recon - ナンバー抽出\n");

            let rows = scanner::load_event_rows(&events)
                .with_context(|| format!("認識ログを読み込めません: {}", events.display()))?;
            let plates = pipeline::extract_plates(&rows)
                .with_context(|| format!("ナンバーを抽出できません: {}", events.display()))?;
            println!("✔ {}行中 {}件のナンバーを抽出", rows.len(), plates.len());

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let path = export::export_plates(&plates, &output_dir)?;
            println!("✔ 出力: {}", path.display());
        }

        Commands::Dates { events } => {
            let rows = scanner::load_event_rows(&events)
                .with_context(|| format!("認識ログを読み込めません: {}", events.display()))?;
            let (decoded, stats) = pipeline::decode_rows(&rows);
            println!("日付一覧 ({}件 / 破棄 {}行):", decoded.len(), stats.dropped_rows());
            print!("{}", report::render_dates(&pipeline::available_dates(&decoded)));
        }

        Commands::Config { set_threshold, set_default_date, show } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました: {}", threshold);
            }

            if let Some(date) = set_default_date {
                config.set_default_date(date.clone())?;
                println!("✔ 既定の対象日を設定しました: {}", date);
            }

            if show {
                println!("設定:");
                println!("  類似度の閾値: {}", config.similarity_threshold);
                println!("  既定の対象日: {}", config.default_date.as_deref().unwrap_or("All"));
                println!("  既定の出力形式: {}", config.default_format);
                let layout = &config.directory_layout;
                println!(
                    "  名簿XML要素: {} (部屋 {}, 氏名 {}, ナンバー {})",
                    layout.record_tag, layout.room_tag, layout.name_tag, layout.plate_tag
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
