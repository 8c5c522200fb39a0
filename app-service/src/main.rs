use app_service::{config::AppConfig, Application};
use service_core::lifecycle::ShutdownOutcome;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration - fail fast if invalid
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&config.service_name, &config.log_level, config.log_format);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        "Starting service"
    );

    let application = Application::build(config).await?;

    let outcome = application.run_until_stopped().await?;
    if let ShutdownOutcome::TimedOut(_) = outcome {
        // In-flight connections are abandoned.
        std::process::exit(outcome.exit_code());
    }

    tracing::info!("Process terminated");
    Ok(())
}
