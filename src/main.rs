use clap::Parser;
use spiral_print::utils::error::ErrorSeverity;
use spiral_print::utils::{logger, validation::Validate};
use spiral_print::{CliConfig, GridPipeline, LoadOutcome, LocalStorage, SpiralEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::default();
    let pipeline = GridPipeline::new(storage, config);
    let engine = SpiralEngine::new(pipeline);

    match engine.run() {
        Ok(LoadOutcome::Rendered(text)) => {
            print!("{}", text);
        }
        Ok(LoadOutcome::Written(path)) => {
            println!("📁 Report saved to: {}", path);
        }
        Err(e) => {
            tracing::error!(
                "Spiral run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

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
