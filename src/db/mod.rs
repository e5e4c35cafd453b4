use async_trait::async_trait;

use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::shared::error::AppError;

pub mod memory;
pub mod pg;

pub use memory::MemoryRepository;
pub use pg::PostgrePool;

/// 员工表的存取接口，服务层只依赖这个 trait
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// 插入一条记录，返回新分配的 id
    async fn insert(&self, emp: NewEmployee) -> Result<i32, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError>;

    /// 只更新 `changes` 中给出的字段，返回受影响的行数
    async fn update_selective(&self, id: i32, changes: EmployeeChanges) -> Result<u64, AppError>;

    async fn delete_by_id(&self, id: i32) -> Result<u64, AppError>;

    async fn delete_batch(&self, ids: &[i32]) -> Result<u64, AppError>;

    async fn count_by_name(&self, emp_name: &str) -> Result<i64, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// 按 id 升序取一页
    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, AppError>;

    async fn list_departments(&self) -> Result<Vec<Department>, AppError>;
}
