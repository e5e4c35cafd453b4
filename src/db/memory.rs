use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::EmployeeRepository;
use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::shared::error::AppError;

#[derive(Debug, Default)]
struct MemoryState {
    // 单调递增，删除后不回收
    last_id: i32,
    emps: BTreeMap<i32, Employee>,
    depts: Vec<Department>,
}

/// 进程内存储，`database.backend = "memory"` 时使用，也供测试使用
#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带上和迁移脚本相同的两个部门
    pub fn with_default_departments() -> Self {
        Self::with_departments(vec![
            Department {
                dept_id: 1,
                dept_name: "开发部".to_string(),
            },
            Department {
                dept_id: 2,
                dept_name: "测试部".to_string(),
            },
        ])
    }

    pub fn with_departments(depts: Vec<Department>) -> Self {
        MemoryRepository {
            state: Arc::new(Mutex::new(MemoryState {
                depts,
                ..Default::default()
            })),
        }
    }
}

fn attach_department(mut emp: Employee, depts: &[Department]) -> Employee {
    emp.department = emp
        .d_id
        .and_then(|d_id| depts.iter().find(|d| d.dept_id == d_id).cloned());
    emp
}

#[async_trait]
impl EmployeeRepository for MemoryRepository {
    async fn insert(&self, emp: NewEmployee) -> Result<i32, AppError> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let emp_id = state.last_id;
        state.emps.insert(
            emp_id,
            Employee {
                emp_id,
                emp_name: emp.emp_name,
                gender: emp.gender,
                email: emp.email,
                d_id: emp.d_id,
                hire_date: emp.hire_date,
                department: None,
            },
        );
        Ok(emp_id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .emps
            .get(&id)
            .cloned()
            .map(|emp| attach_department(emp, &state.depts)))
    }

    async fn update_selective(&self, id: i32, changes: EmployeeChanges) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        match state.emps.get_mut(&id) {
            Some(emp) if !changes.is_empty() => {
                changes.apply_to(emp);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: i32) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.emps.remove(&id).map_or(0, |_| 1))
    }

    async fn delete_batch(&self, ids: &[i32]) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let mut removed = 0;
        for id in ids {
            if state.emps.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn count_by_name(&self, emp_name: &str) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .emps
            .values()
            .filter(|emp| emp.emp_name == emp_name)
            .count() as i64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.state.lock().await.emps.len() as i64)
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, AppError> {
        let state = self.state.lock().await;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .emps
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .map(|emp| attach_department(emp, &state.depts))
            .collect())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        Ok(self.state.lock().await.depts.clone())
    }
}
