use clap::Parser;
use todod::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todod=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = todod::server::run(config).await {
        tracing::error!(error = %e, "todod failed");
        return Err(e.into());
    }
    Ok(())
}
