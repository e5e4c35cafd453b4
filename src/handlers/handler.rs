use std::collections::BTreeMap;

use crate::dtos::request::{self, DeleteTarget};
use crate::models::employee::EmployeeChanges;
use crate::services::service::EmployeeService;
use crate::shared::error::AppError;
use crate::shared::response::Msg;
use axum::{
    Form,
    extract::{Path, Query, State},
};
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

/// 单个或批量删除员工，批量时 id 之间用 `-` 连接
#[axum::debug_handler]
pub async fn delete_emp(
    State(service): State<EmployeeService>,
    Path(ids): Path<String>,
) -> Result<Msg, AppError> {
    // 先把所有 id 解析完，再调用删除
    match ids.parse::<DeleteTarget>()? {
        DeleteTarget::Batch(del_ids) => {
            info!("batch delete employees {:?}", del_ids);
            service.delete_batch(&del_ids).await?;
        }
        DeleteTarget::Single(id) => {
            info!("delete employee {}", id);
            service.delete_emp(id).await?;
        }
    }
    Ok(Msg::success())
}

#[axum::debug_handler]
pub async fn update_emp(
    State(service): State<EmployeeService>,
    Path(emp_id): Path<i32>,
    Form(patch): Form<request::EmployeePatch>,
) -> Result<Msg, AppError> {
    debug!("update employee {}: {:?}", emp_id, patch);
    let changes = EmployeeChanges::try_from(patch)?;
    service.update_emp(emp_id, changes).await?;
    Ok(Msg::success())
}

#[axum::debug_handler]
pub async fn get_emp(
    State(service): State<EmployeeService>,
    Path(id): Path<i32>,
) -> Result<Msg, AppError> {
    debug!("get employee {}", id);
    let emp = service.get_emp(id).await?;
    Ok(Msg::success().add("emp", &emp))
}

#[axum::debug_handler]
pub async fn check_user(
    State(service): State<EmployeeService>,
    Query(params): Query<request::CheckUserParams>,
) -> Result<Msg, AppError> {
    check_user_name(&service, &params.emp_name).await
}

/// 前端用表单 POST 提交时走这里
#[axum::debug_handler]
pub async fn check_user_form(
    State(service): State<EmployeeService>,
    Form(params): Form<request::CheckUserParams>,
) -> Result<Msg, AppError> {
    check_user_name(&service, &params.emp_name).await
}

async fn check_user_name(service: &EmployeeService, emp_name: &str) -> Result<Msg, AppError> {
    // 格式不对就不查库
    if !request::is_valid_emp_name(emp_name) {
        return Ok(Msg::fail().add(
            "va_msg",
            "用户名必须是 6-16 位数字和字母的组合或者2-5位中文",
        ));
    }
    if service.check_user(emp_name).await? {
        Ok(Msg::success())
    } else {
        Ok(Msg::fail().add("va_msg", "用户名不可用"))
    }
}

#[axum::debug_handler]
pub async fn save_emp(
    State(service): State<EmployeeService>,
    Form(payload): Form<request::EmployeeForm>,
) -> Result<Msg, AppError> {
    if let Err(errors) = payload.validate() {
        // 校验失败，把每个字段的错误信息返回给前端
        let error_fields = field_error_messages(&errors);
        info!("employee form rejected: {:?}", error_fields);
        return Ok(Msg::fail().add("errorFields", &error_fields));
    }
    service.save_emp(payload.into_new_employee()).await?;
    Ok(Msg::success())
}

#[axum::debug_handler]
pub async fn get_emps(
    State(service): State<EmployeeService>,
    Query(params): Query<request::PageParams>,
) -> Result<Msg, AppError> {
    let pn = params.pn.unwrap_or(1);
    debug!("list employees, pn={} page_size={}", pn, service.page_size());
    let page = service.get_page(pn).await?;
    Ok(Msg::success().add("pageInfo", &page))
}

#[axum::debug_handler]
pub async fn get_depts(State(service): State<EmployeeService>) -> Result<Msg, AppError> {
    let depts = service.get_depts().await?;
    Ok(Msg::success().add("depts", &depts))
}

// 每个字段取第一条错误信息
fn field_error_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let message = errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Unknown error".to_string());
            (field.to_string(), message)
        })
        .collect()
}
