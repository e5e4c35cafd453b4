use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use super::EmployeeRepository;
use crate::{
    models::{
        department::Department,
        employee::{Employee, EmployeeChanges, EmployeeRow, NewEmployee},
    },
    shared::{error::AppError, setting::DatabaseConfig},
};

const SELECT_EMP_WITH_DEPT: &str = r#"
    SELECT e.emp_id, e.emp_name, e.gender, e.email, e.d_id, e.hire_date, d.dept_name
    FROM tbl_emp e
    LEFT JOIN tbl_dept d ON e.d_id = d.dept_id
"#;

#[derive(Clone)]
pub struct PostgrePool {
    pub pool: sqlx::PgPool,
}

impl PostgrePool {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        info!("connected to postgres, max_connections={}", config.max_connections);
        Ok(PostgrePool { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn log_db_error(op: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        error!("{} failed: {}", op, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl EmployeeRepository for PostgrePool {
    async fn insert(&self, emp: NewEmployee) -> Result<i32, AppError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO tbl_emp (emp_name, gender, email, d_id, hire_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING emp_id
            "#,
        )
        .bind(&emp.emp_name)
        .bind(&emp.gender)
        .bind(&emp.email)
        .bind(emp.d_id)
        .bind(emp.hire_date)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("insert employee"))?;
        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let sql = format!("{} WHERE e.emp_id = $1", SELECT_EMP_WITH_DEPT);
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_db_error("find employee"))?;
        Ok(row.map(Employee::from))
    }

    async fn update_selective(&self, id: i32, changes: EmployeeChanges) -> Result<u64, AppError> {
        if changes.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            UPDATE tbl_emp SET
                emp_name  = COALESCE($2, emp_name),
                gender    = COALESCE($3, gender),
                email     = COALESCE($4, email),
                d_id      = COALESCE($5, d_id),
                hire_date = COALESCE($6, hire_date)
            WHERE emp_id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.emp_name)
        .bind(&changes.gender)
        .bind(&changes.email)
        .bind(changes.d_id)
        .bind(changes.hire_date)
        .execute(&self.pool)
        .await
        .map_err(log_db_error("update employee"))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tbl_emp WHERE emp_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_db_error("delete employee"))?;
        Ok(result.rows_affected())
    }

    async fn delete_batch(&self, ids: &[i32]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM tbl_emp WHERE emp_id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(log_db_error("batch delete employees"))?;
        Ok(result.rows_affected())
    }

    async fn count_by_name(&self, emp_name: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tbl_emp WHERE emp_name = $1")
            .bind(emp_name)
            .fetch_one(&self.pool)
            .await
            .map_err(log_db_error("count employees by name"))
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tbl_emp")
            .fetch_one(&self.pool)
            .await
            .map_err(log_db_error("count employees"))
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, AppError> {
        let sql = format!(
            "{} ORDER BY e.emp_id LIMIT $1 OFFSET $2",
            SELECT_EMP_WITH_DEPT
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(log_db_error("list employees"))?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        sqlx::query_as::<_, Department>("SELECT dept_id, dept_name FROM tbl_dept ORDER BY dept_id")
            .fetch_all(&self.pool)
            .await
            .map_err(log_db_error("list departments"))
    }
}
