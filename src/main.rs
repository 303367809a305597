use clap::Parser;
use fund_order_summary::utils::{logger, validation::Validate};
use fund_order_summary::{
    CliConfig, DocumentLoader, LocalStorage, SummaryConfig, SummaryEngine, SummaryError,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    let resolved = cli.resolve();

    // 初始化日誌
    let config_ref = resolved.as_ref().ok();
    if cli.json_logs(config_ref) {
        logger::init_json_logger(cli.verbose(config_ref));
    } else {
        logger::init_cli_logger(cli.verbose(config_ref));
    }

    tracing::info!("Starting fund-order-summary");

    let config = match resolved.and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Resolved config: {:?}", redacted(&config));

    if let Err(e) = run(&cli, config).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &CliConfig, config: SummaryConfig) -> Result<(), SummaryError> {
    let loader = DocumentLoader::new(config.source.cookie.clone());
    let storage = LocalStorage::new(config.output.path.clone());
    let engine = SummaryEngine::new(loader, storage, config)?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - orders are not fetched and nothing is written");
        for preview in engine.locate_only().await? {
            println!("{:<32} <{}> {}", preview.region.name(), preview.tag, preview.text);
        }
        return Ok(());
    }

    let report = engine.run().await?;

    tracing::info!("✅ Summary added for {} orders", report.summary.orders.len());
    tracing::info!("📁 Output saved to: {}", report.output_path);

    if cli.report {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        println!("✅ {} pending fund orders, total {}", report.summary.orders.len(), report.summary.total);
        println!("📁 Output saved to: {}", report.output_path);
    }

    Ok(())
}

/// 日誌中不輸出 cookie
fn redacted(config: &SummaryConfig) -> SummaryConfig {
    let mut copy = config.clone();
    if copy.source.cookie.is_some() {
        copy.source.cookie = Some("<redacted>".to_string());
    }
    copy
}
