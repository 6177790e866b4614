use anyhow::Result;
use clap::Parser;
use rental_cli::{
    cli::{Args, CliApp},
    utils::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?;

    let filter = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Configuration loaded for {} environment, API at {}",
        config.environment,
        config.api_url
    );

    let app = CliApp::new(&config)?;
    app.run(args).await
}
