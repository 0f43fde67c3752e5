use bin_verify::{cli, config, detector, error, image_input, input, logging, relay, report, session};
use bin_verify_common::{AnalysisResults, ProductCatalog, ReconcileOptions};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use detector::{DetectionSource, HttpDetectionSource, RecordedDetections};
use error::Result;
use image_input::BinImage;
use indicatif::{ProgressBar, ProgressStyle};
use session::AnalysisSession;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CATALOG: &str = "unique_product_names.txt";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, items, item, detections, endpoint, policy, threshold, output, json } => {
            println!("📦 bin-verify - ビン照合\n");

            // 1. 画像読み込み
            println!("[1/3] 画像を読み込み中...");
            let bin_image = BinImage::load(&image)?;
            println!("✔ {} ({}, {} bytes)\n", bin_image.file_name, bin_image.mime_type, bin_image.size());

            let mut session = AnalysisSession::new();
            session.set_image(bin_image);

            // 2. 期待品目
            println!("[2/3] 期待品目を読み込み中...");
            if let Some(items_path) = &items {
                let parsed = input::load_items_file(items_path)?;
                for rejected in &parsed.rejected {
                    println!("⚠ {}行目を無視: \"{}\" ({})", rejected.line_number, rejected.content, rejected.reason);
                }
                session.add_items(parsed.items);
            }
            session.add_items(input::parse_item_args(&item)?);
            println!("✔ {}品目\n", session.expected_items().len());

            if cli.verbose {
                for expected in session.expected_items() {
                    println!("  - {}", expected);
                }
            }

            let options = reconcile_options(&config, policy, threshold)?;

            // 3. 検出・照合
            println!("[3/3] 検出・照合中... (ポリシー: {}, 閾値: {})", options.policy, options.threshold);
            let results = if let Some(detections_path) = detections {
                let source = RecordedDetections::from_file(&detections_path)?;
                run_with_spinner(&mut session, &source, &options).await?
            } else {
                let source = match endpoint {
                    Some(url) => HttpDetectionSource::new(url, config.timeout_seconds)?,
                    None => HttpDetectionSource::from_config(&config)?,
                };
                if cli.verbose {
                    println!("  エンドポイント: {}", source.endpoint());
                }
                run_with_spinner(&mut session, &source, &options).await?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", report::render(&results));
            }

            if let Some(output) = output {
                report::save_json(&results, &output)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::Parse { input: items_path } => {
            let parsed = input::load_items_file(&items_path)?;

            println!("期待品目: {}件", parsed.items.len());
            for (i, item) in parsed.items.iter().enumerate() {
                println!("  {:>3}. {} × {}", i + 1, item.name, item.quantity);
            }

            if !parsed.rejected.is_empty() {
                println!("\n読み飛ばした行: {}件", parsed.rejected.len());
                for rejected in &parsed.rejected {
                    println!("  {}行目: \"{}\" ({})", rejected.line_number, rejected.content, rejected.reason);
                }
            }
        }

        Commands::Search { query, catalog, limit, pick, append } => {
            let catalog_path = catalog
                .or_else(|| config.catalog_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));
            if !catalog_path.exists() {
                return Err(error::BinVerifyError::FileNotFound(catalog_path.display().to_string()));
            }
            let product_catalog = ProductCatalog::load(&catalog_path)?;

            if cli.verbose {
                println!("カタログ: {} ({}件)", catalog_path.display(), product_catalog.len());
            }

            if pick {
                if let Some(picked) = input::run_interactive_pick(&product_catalog, &query, limit)? {
                    match append {
                        Some(items_path) => {
                            input::append_item_line(&items_path, &picked)?;
                            println!("✔ 追記しました: {} → {}", picked, items_path.display());
                        }
                        None => println!("{}", picked),
                    }
                }
            } else {
                let hits = product_catalog.search(&query, limit);
                if hits.is_empty() {
                    println!("該当する商品がありません: {}", query);
                }
                for hit in hits {
                    println!("{}", hit);
                }
            }
        }

        Commands::Serve { port, model_url } => {
            let port = port.unwrap_or(config.relay_port);
            let model_api_url = model_url.or_else(|| config.model_api_url());
            let state = relay::RelayState::new(model_api_url, config.timeout_seconds)?;
            relay::serve(port, state).await?;
        }

        Commands::Config { set_endpoint, set_catalog, show } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ 検出エンドポイントを設定しました");
            }

            if let Some(path) = set_catalog {
                config.set_catalog(path)?;
                println!("✔ カタログを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint.as_deref().unwrap_or("未設定"));
                println!(
                    "  カタログ: {}",
                    config
                        .catalog_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  照合ポリシー: {}", config.policy);
                println!("  閾値: {}", config.threshold);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  リレーポート: {}", config.relay_port);
                println!("  モデルAPI: {}", config.model_api_url.as_deref().unwrap_or("未設定"));
            }
        }
    }

    Ok(())
}

/// 設定値にCLIの指定を重ねた照合オプション
fn reconcile_options(
    config: &Config,
    policy: Option<bin_verify_common::MatchPolicy>,
    threshold: Option<f64>,
) -> Result<ReconcileOptions> {
    let merged = Config {
        policy: policy.unwrap_or(config.policy),
        threshold: threshold.unwrap_or(config.threshold),
        ..config.clone()
    };
    merged.validate()?;
    Ok(merged.reconcile_options())
}

/// 検出中はスピナーを表示
async fn run_with_spinner<S: DetectionSource>(
    session: &mut AnalysisSession,
    source: &S,
    options: &ReconcileOptions,
) -> Result<AnalysisResults> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message("ビンの内容を解析中...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.run(source, options).await.cloned();
    spinner.finish_and_clear();

    if outcome.is_ok() {
        println!("✔ 照合完了\n");
    }
    outcome
}
