use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use employee_crud_backend::{
    create_router,
    db::{EmployeeRepository, MemoryRepository},
    models::{
        department::Department,
        employee::{Employee, EmployeeChanges, NewEmployee},
    },
    services::service::EmployeeService,
    shared::{error::AppError, setting::PageConfig},
};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert(String),
    FindById(i32),
    Update(i32),
    DeleteById(i32),
    DeleteBatch(Vec<i32>),
    CountByName(String),
    Count,
    FindPage { offset: i64, limit: i64 },
    ListDepartments,
}

/// 记录每次存储调用的仓库
#[derive(Clone)]
pub struct RecordingRepository {
    inner: MemoryRepository,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        RecordingRepository {
            inner: MemoryRepository::with_default_departments(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub async fn seed(&self, names: &[&str]) -> Vec<i32> {
        let mut ids = Vec::new();
        for name in names {
            let id = self
                .inner
                .insert(NewEmployee {
                    emp_name: name.to_string(),
                    gender: Some("M".to_string()),
                    email: Some(format!("{}@example.com", name)),
                    d_id: Some(1),
                    hire_date: None,
                })
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }
}

#[async_trait]
impl EmployeeRepository for RecordingRepository {
    async fn insert(&self, emp: NewEmployee) -> Result<i32, AppError> {
        self.record(Call::Insert(emp.emp_name.clone()));
        self.inner.insert(emp).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        self.record(Call::FindById(id));
        self.inner.find_by_id(id).await
    }

    async fn update_selective(&self, id: i32, changes: EmployeeChanges) -> Result<u64, AppError> {
        self.record(Call::Update(id));
        self.inner.update_selective(id, changes).await
    }

    async fn delete_by_id(&self, id: i32) -> Result<u64, AppError> {
        self.record(Call::DeleteById(id));
        self.inner.delete_by_id(id).await
    }

    async fn delete_batch(&self, ids: &[i32]) -> Result<u64, AppError> {
        self.record(Call::DeleteBatch(ids.to_vec()));
        self.inner.delete_batch(ids).await
    }

    async fn count_by_name(&self, emp_name: &str) -> Result<i64, AppError> {
        self.record(Call::CountByName(emp_name.to_string()));
        self.inner.count_by_name(emp_name).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.record(Call::Count);
        self.inner.count().await
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, AppError> {
        self.record(Call::FindPage { offset, limit });
        self.inner.find_page(offset, limit).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        self.record(Call::ListDepartments);
        self.inner.list_departments().await
    }
}

pub fn app(repo: &RecordingRepository) -> Router {
    let service = EmployeeService::new(Arc::new(repo.clone()), PageConfig::default());
    create_router(service)
}

pub async fn send(app: Router, method: &str, uri: &str, form: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match form {
        Some(body) => builder
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
