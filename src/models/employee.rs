use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::department::Department;

/// 员工实体，读取时带上所属部门
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub emp_id: i32, // 数据库自增ID，删除后不会复用
    pub emp_name: String,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub d_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    pub department: Option<Department>,
}

/// `tbl_emp LEFT JOIN tbl_dept` 的查询结果
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub emp_id: i32,
    pub emp_name: String,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub d_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    pub dept_name: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        let department = match (row.d_id, row.dept_name) {
            (Some(dept_id), Some(dept_name)) => Some(Department { dept_id, dept_name }),
            _ => None,
        };
        Employee {
            emp_id: row.emp_id,
            emp_name: row.emp_name,
            gender: row.gender,
            email: row.email,
            d_id: row.d_id,
            hire_date: row.hire_date,
            department,
        }
    }
}

/// 待插入的员工，id 由存储层分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub emp_name: String,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub d_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
}

/// 选择性更新：只有 `Some` 的字段会被写入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub emp_name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub d_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.emp_name.is_none()
            && self.gender.is_none()
            && self.email.is_none()
            && self.d_id.is_none()
            && self.hire_date.is_none()
    }

    pub fn apply_to(self, emp: &mut Employee) {
        if let Some(name) = self.emp_name {
            emp.emp_name = name;
        }
        if self.gender.is_some() {
            emp.gender = self.gender;
        }
        if self.email.is_some() {
            emp.email = self.email;
        }
        if self.d_id.is_some() {
            emp.d_id = self.d_id;
        }
        if self.hire_date.is_some() {
            emp.hire_date = self.hire_date;
        }
    }
}
