use std::str::FromStr;

use employee_crud_backend::{
    build_service, create_router,
    shared::{error::AppError, setting},
};
use tracing::{Level, info, warn};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = setting::load_config()?;

    let level = Level::from_str(&config.log.level).ok();
    tracing_subscriber::fmt()
        .with_max_level(level.unwrap_or(Level::INFO))
        .init();
    if level.is_none() {
        warn!("unknown log level `{}`, falling back to info", config.log.level);
    }

    let service = build_service(&config).await?;
    let app = create_router(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
