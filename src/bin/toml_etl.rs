use anyhow::Context;
use clap::Parser;
use tweet_etl::core::ConfigProvider;
use tweet_etl::utils::error::ErrorSeverity;
use tweet_etl::utils::{logger, validation::Validate};
use tweet_etl::{read_json, EtlEngine, LocalStorage, TomlConfig, TweetPipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Tweet extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "tweet-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override save setting from config
    #[arg(long)]
    save: Option<bool>,

    /// Dry run - parse the input and show what would be produced
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 日誌設定可能來自配置檔
    logger::init_logger(args.verbose, config.log_level(), config.json_logs());

    tracing::info!("🚀 Starting TOML-based tweet extraction");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(save) = args.save {
        config.load.save = save;
        tracing::info!("🔧 Save overridden to: {}", save);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        return perform_dry_run(&config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = TweetPipeline::new(LocalStorage::default(), config)
        .context("failed to initialise sentiment lexicon")?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Extraction completed: {} rows", outcome.table.len());
            match outcome.output_path {
                Some(path) => println!("📁 Output saved to: {}", path),
                None => print!("{}", outcome.csv_output),
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.input_path());
    println!("  Schema: {}", config.schema());
    println!(
        "  Output: {}/{} (save: {})",
        config.output_path(),
        config.output_file(),
        config.save_output()
    );

    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }

    if let Some(lexicon) = config.lexicon_path() {
        println!("  Lexicon overrides: {}", lexicon);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let (count, records) = read_json(config.input_path())
        .with_context(|| format!("failed to read {}", config.input_path()))?;

    println!("🔍 Dry Run Analysis:");
    println!("  Records in input: {}", count);

    let to_process = config.max_records().map_or(count, |max| max.min(count));
    println!("  Records to process: {}", to_process);

    let with_flag = records
        .iter()
        .take(to_process)
        .filter(|r| r.data.contains_key("possibly_sensitive"))
        .count();
    if with_flag < to_process {
        println!(
            "  ⚠️ {} of {} records lack possibly_sensitive; that column will be null",
            to_process - with_flag,
            to_process
        );
    }

    println!("  Columns ({}):", config.schema().columns().len());
    for column in config.schema().columns() {
        println!("    - {}", column);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
    Ok(())
}
