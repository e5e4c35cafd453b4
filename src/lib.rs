use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

// 模块声明
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod shared;
pub mod vos;
// 类型导入
use crate::{
    db::{EmployeeRepository, MemoryRepository, PostgrePool},
    handlers::handler,
    services::service::EmployeeService,
    shared::{
        error::AppError,
        setting::{Settings, StorageBackend},
    },
};

/// 按配置选择存储后端并组装服务
pub async fn build_service(settings: &Settings) -> Result<EmployeeService, AppError> {
    let repo: Arc<dyn EmployeeRepository> = match settings.database.backend {
        StorageBackend::Postgres => {
            let pg = PostgrePool::new(&settings.database).await?;
            pg.migrate().await?;
            Arc::new(pg)
        }
        StorageBackend::Memory => {
            info!("using in-memory employee storage");
            Arc::new(MemoryRepository::with_default_departments())
        }
    };
    Ok(EmployeeService::new(repo, settings.pagination))
}

/// 创建应用路由
pub fn create_router(service: EmployeeService) -> Router {
    Router::new()
        .route(
            "/emp/{id}",
            get(handler::get_emp)
                .put(handler::update_emp)
                .delete(handler::delete_emp),
        )
        .route("/emp", post(handler::save_emp))
        .route("/emps", get(handler::get_emps))
        .route(
            "/checkuser",
            get(handler::check_user).post(handler::check_user_form),
        )
        .route("/depts", get(handler::get_depts))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}
