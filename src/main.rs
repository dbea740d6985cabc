//! model-roulette HTTP server and command-line tools
//!
//! Starts an Axum proxy that randomizes the model of every chat completion,
//! or runs one of the offline subcommands.

use clap::Parser;
use model_roulette::cli::{self, Cli, Command};
use model_roulette::config::Config;
use model_roulette::error::AppError;
use model_roulette::handlers::{self, AppState};
use model_roulette::models::{
    CatalogProvider, ModelSelector, OpenRouterCatalog, Pool, seed_selection, sort_catalog,
};
use model_roulette::telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { output }) => write_config_template(output.as_deref()),
        Some(Command::Models) => list_models(&cli.config).await,
        Some(Command::Pick { count, models }) => pick(&cli.config, count, models),
        Some(Command::Serve) | None => serve(&cli.config).await,
    }
}

fn write_config_template(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let template = cli::generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template)?;
            eprintln!("Configuration template written to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}

fn catalog_for(config: &Config) -> Result<OpenRouterCatalog, Box<dyn std::error::Error>> {
    Ok(OpenRouterCatalog::new(
        &config.upstream.base_url,
        config.upstream.api_key(),
        config.catalog.timeout(),
    )?)
}

async fn list_models(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_file(config_path)?;
    telemetry::init(&config.observability.log_level);

    let mut catalog = catalog_for(&config)?.fetch_models().await?;
    sort_catalog(&mut catalog);

    for model in &catalog {
        println!("{}", cli::format_catalog_line(model));
    }
    eprintln!("{} models", catalog.len());
    Ok(())
}

fn pick(
    config_path: &str,
    count: usize,
    models: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Models on the command line make the config file optional
    let pool: Pool = if models.is_empty() {
        Config::from_file(config_path)?
            .randomizer
            .default_selection
            .into_iter()
            .collect()
    } else {
        models.into_iter().collect()
    };

    let picks = cli::pick_many(&ModelSelector::new(), &pool, count, &mut rand::rng());
    if picks.is_empty() && count > 0 {
        return Err(AppError::NoModelsSelected.into());
    }

    for model in picks {
        println!("{}", model);
    }
    Ok(())
}

async fn serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(Config::from_file(config_path)?);

    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting model-roulette on {}:{}",
        config.server.host,
        config.server.port
    );

    let state = AppState::from_config(config.clone())?;

    let catalog = if config.catalog.fetch_on_startup {
        Some(catalog_for(&config)?)
    } else {
        None
    };
    seed_selection(
        state.store(),
        catalog.as_ref().map(|c| c as &dyn CatalogProvider),
        &config.randomizer.default_selection,
    )
    .await?;

    let app = handlers::router(state);
    let addr = config.server.socket_addr()?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Chat completions available at http://{}/v1/chat/completions", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
