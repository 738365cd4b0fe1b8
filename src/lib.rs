pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod services;
pub mod state;

use anyhow::Context;
pub use cli::{Cli, Commands};
pub use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::commands::cmd_serve(config).await,

        Commands::CreateSuperuser {
            email,
            name,
            password,
        } => cli::commands::cmd_create_superuser(&config, &email, &name, password).await,

        Commands::Init => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            cli::commands::cmd_init(&path)
        }
    }
}

/// Sets up the global subscriber: env filter, plain or JSON fmt output and,
/// when enabled, shipping to Loki.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json_logs = config.observability.json_logs;
    let json_layer = json_logs.then(|| tracing_subscriber::fmt::layer().json());
    let fmt_layer = (!json_logs).then(tracing_subscriber::fmt::layer);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "tessera")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}
