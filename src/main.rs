use std::net::SocketAddr;
use std::sync::Arc;
use studio_portfolio::utils::config::Config;
use studio_portfolio::utils::logging;
use studio_portfolio::{db, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cfg = Config::from_env();
    let db_path = cfg.db_path();
    if let Some(dir) = db_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let pool = db::create_pool(&db_path, cfg.db_pool_size)?;
    info!(db = %db_path.display(), cloud = %cfg.cdn_cloud_name, page_size = cfg.page_size, "catalog opened");

    let port = cfg.port;
    let state = Arc::new(AppState::new(cfg, pool));
    let app = studio_portfolio::api::routes::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening" = %addr);
    axum::serve(listener, app).await?;
    Ok(())
}
