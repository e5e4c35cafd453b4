use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::response::Msg;

#[derive(Debug, Error)]
pub enum AppError {
    /// 无法解析的请求参数，例如 `1-a-3` 这样的 id 列表
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            Self::MalformedInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // 数据库错误已在存储层记录
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(Msg::fail().add("error", &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_is_bad_request() {
        let resp = AppError::MalformedInput("bad id".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_is_internal() {
        let resp = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
