use anyhow::Context;
use notion_engine::NotionProxy;
use notion_proxy::{build_router, config, logging};
use proxy_logging::proxy_info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    logging::initialize(config.log_destination, config.log_level()?);

    let proxy = NotionProxy::with_reqwest(
        config.upstream.fetch_settings(),
        config.upstream.upstream_settings(),
    )
    .context("building upstream client")?;
    let app = build_router(proxy, &config.route);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    proxy_info!("listening on http://{}{}", config.bind, config.route);

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
