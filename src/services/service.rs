use std::sync::Arc;

use tracing::{debug, info};

use crate::db::EmployeeRepository;
use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::shared::error::AppError;
use crate::shared::setting::PageConfig;
use crate::vos::{PageInfo, page_info::page_count};

#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    paging: PageConfig,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, paging: PageConfig) -> Self {
        EmployeeService { repo, paging }
    }

    pub fn page_size(&self) -> i64 {
        self.paging.page_size
    }

    pub async fn save_emp(&self, emp: NewEmployee) -> Result<i32, AppError> {
        let id = self.repo.insert(emp).await?;
        info!("saved employee {}", id);
        Ok(id)
    }

    pub async fn get_emp(&self, id: i32) -> Result<Option<Employee>, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn update_emp(&self, id: i32, changes: EmployeeChanges) -> Result<(), AppError> {
        let affected = self.repo.update_selective(id, changes).await?;
        debug!("update employee {}: {} row(s)", id, affected);
        Ok(())
    }

    pub async fn delete_emp(&self, id: i32) -> Result<(), AppError> {
        let affected = self.repo.delete_by_id(id).await?;
        debug!("delete employee {}: {} row(s)", id, affected);
        Ok(())
    }

    pub async fn delete_batch(&self, ids: &[i32]) -> Result<(), AppError> {
        let affected = self.repo.delete_batch(ids).await?;
        debug!("batch delete {:?}: {} row(s)", ids, affected);
        Ok(())
    }

    /// 用户名可用返回 true
    pub async fn check_user(&self, emp_name: &str) -> Result<bool, AppError> {
        Ok(self.repo.count_by_name(emp_name).await? == 0)
    }

    /// 分页查询，页码越界时按 `reasonable` 修正
    pub async fn get_page(&self, page_num: i64) -> Result<PageInfo<Employee>, AppError> {
        let page_size = self.paging.page_size.max(1);
        let total = self.repo.count().await?;
        let pages = page_count(total, page_size);

        let page_num = if self.paging.reasonable {
            page_num.min(pages).max(1)
        } else {
            page_num
        };

        // 乘法溢出说明页码远超数据范围，直接返回空页
        let offset = page_num.saturating_sub(1).max(0).checked_mul(page_size);
        let list = match offset {
            Some(offset) if offset < total => self.repo.find_page(offset, page_size).await?,
            _ => Vec::new(),
        };

        Ok(PageInfo::new(
            list,
            total,
            page_num,
            page_size,
            self.paging.navigate_pages,
        ))
    }

    pub async fn get_depts(&self) -> Result<Vec<Department>, AppError> {
        self.repo.list_departments().await
    }
}
