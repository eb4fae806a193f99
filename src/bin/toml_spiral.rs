use clap::Parser;
use spiral_print::core::Pipeline;
use spiral_print::domain::ports::{ConfigProvider, GridSource};
use spiral_print::utils::error::ErrorSeverity;
use spiral_print::utils::{logger, validation::Validate};
use spiral_print::{GridPipeline, LoadOutcome, LocalStorage, SpiralEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-spiral")]
#[command(about = "Flatten batches of grids described in a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "spiral.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Load and check every grid without writing a report
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    // 相對路徑以設定檔所在目錄為基準
    let storage = LocalStorage::new(config.base_dir.clone());
    let pipeline = GridPipeline::new(storage, config);

    if args.dry_run {
        perform_dry_run(&pipeline)?;
        return Ok(());
    }

    let engine = SpiralEngine::new(pipeline);

    match engine.run() {
        Ok(LoadOutcome::Rendered(text)) => print!("{}", text),
        Ok(LoadOutcome::Written(path)) => println!("📁 Report saved to: {}", path),
        Err(e) => {
            tracing::error!(
                "Spiral run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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
    eprintln!("📋 Job: {}", config.job_name());
    if let Some(description) = &config.job.description {
        eprintln!("  {}", description);
    }
    eprintln!("  Shape policy: {}", config.shape_policy());
    eprintln!("  Grids: {}", config.grids.len());
    for source in config.grid_sources() {
        eprintln!("    - {}", describe(&source));
    }
    eprintln!(
        "  Output: {} ({})",
        config.output_path().unwrap_or("stdout"),
        config.output_format()
    );
    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }
    eprintln!();
}

fn perform_dry_run(
    pipeline: &GridPipeline<LocalStorage, TomlConfig>,
) -> Result<(), Box<dyn std::error::Error>> {
    let grids = pipeline.extract()?;
    let report = pipeline.transform(grids)?;

    println!("🔍 Dry Run Analysis:");
    for record in &report.records {
        match &record.rejected {
            Some(reason) => println!(
                "  ⚠️ {} ({}x{}): {}",
                record.name, record.rows, record.cols, reason
            ),
            None => println!("  ✅ {} ({}x{})", record.name, record.rows, record.cols),
        }
    }
    println!(
        "✅ {} grids ready, {} rejected. Nothing was written.",
        report.records.len() - report.rejected_count(),
        report.rejected_count()
    );

    Ok(())
}

fn describe(source: &GridSource) -> String {
    match source {
        GridSource::File { path, .. } => path.clone(),
        GridSource::Inline { name, .. } | GridSource::Json { name, .. } => name.clone(),
        GridSource::Demo => "demo".to_string(),
    }
}
