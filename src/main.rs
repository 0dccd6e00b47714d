use anyhow::{bail, Context};
use clap::Parser;
use healcheck::cli::{self, Cli, Commands};
use healcheck::config::AppConfig;
use healcheck::logging::init_logging;
use healcheck::ml::ModelRegistry;
use healcheck::server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Err(errors) = config.validate() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }

    let _log_guard = init_logging(&config.logging, config.server.debug);

    info!("Loading artifacts from {}", config.artifacts.dir.display());
    let registry = ModelRegistry::load(&config.artifacts).context("failed to load artifacts")?;

    match cli.command {
        None | Some(Commands::Serve) => {
            server::serve(&config, registry).await?;
        }
        Some(Commands::Check) => {
            print!("{}", cli::describe_registry(&registry));
        }
        Some(Commands::Predict { values }) => {
            let predictions = cli::predict_pairs(&registry, &values)?;
            print!("{}", cli::format_predictions(&predictions));
        }
    }

    Ok(())
}
