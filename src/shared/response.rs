use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

pub const CODE_SUCCESS: u16 = 100;
pub const CODE_FAIL: u16 = 200;

/// 统一的响应信封
///
/// `data` 里放附加信息，比如 `emp`、`pageInfo`、`errorFields`、`va_msg`。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Msg {
    pub code: u16,
    pub msg: String,
    pub data: Map<String, Value>,
}

impl Msg {
    pub fn success() -> Msg {
        Msg {
            code: CODE_SUCCESS,
            msg: "处理成功！".to_string(),
            data: Map::new(),
        }
    }

    pub fn fail() -> Msg {
        Msg {
            code: CODE_FAIL,
            msg: "处理失败！".to_string(),
            data: Map::new(),
        }
    }

    pub fn add<T>(mut self, key: impl Into<String>, value: &T) -> Msg
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            error!("failed to serialize `{}` into msg: {}", key, e);
            Value::Null
        });
        self.data.insert(key, value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

impl IntoResponse for Msg {
    fn into_response(self) -> axum::response::Response {
        // 失败也是正常的业务响应，HTTP 状态保持 200
        (StatusCode::OK, Json(self)).into_response()
    }
}
