use anyhow::Result;
use vid_server::{build, config_from_env, ServerSettings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = ServerSettings::from_config(&config_from_env())?;
    let ax = build(&settings).await?;

    let addr = settings.addr();
    tracing::info!(%addr, public_url = settings.locator.base(), "starting video server");

    ax.listen(addr).await?;

    Ok(())
}
