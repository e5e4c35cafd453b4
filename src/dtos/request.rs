use std::borrow::Cow;
use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::employee::{EmployeeChanges, NewEmployee};
use crate::shared::error::AppError;

lazy_static! {
    /// 6-16 位字母数字（含 `_` `-`），或 2-5 位中文
    pub static ref RE_EMP_NAME: Regex =
        Regex::new("^(?:[a-zA-Z0-9_-]{6,16}|[\u{2E80}-\u{9FFF}]{2,5})$").unwrap();
    pub static ref RE_EMAIL: Regex =
        Regex::new(r"^([a-z0-9_\.-]+)@([\da-z\.-]+)\.([a-z\.]{2,6})$").unwrap();
}

pub fn is_valid_emp_name(name: &str) -> bool {
    RE_EMP_NAME.is_match(name)
}

/// 新增员工的表单
#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeForm {
    #[serde(rename = "empName")]
    #[validate(
        required(message = "用户名不能为空"),
        regex(
            path = "RE_EMP_NAME",
            message = "用户名必须是2-5位中文或者6-16位英文和数字的组合"
        )
    )]
    pub emp_name: Option<String>,

    #[serde(rename = "email")]
    #[validate(regex(path = "RE_EMAIL", message = "邮箱格式不正确"))]
    pub email: Option<String>,

    #[serde(rename = "gender")]
    pub gender: Option<String>,

    // 数字和日期先按字符串接收，转换失败作为字段错误返回
    #[serde(rename = "dId")]
    #[validate(custom = "validate_d_id")]
    pub d_id: Option<String>,

    #[serde(rename = "hireDate")]
    #[validate(custom = "validate_hire_date")]
    pub hire_date: Option<String>,
}
/*
required 只对 Option<T> 生效
regex 在值为 None 时直接跳过
*/

const D_ID_MISMATCH: &str = "部门编号必须是整数";
const HIRE_DATE_MISMATCH: &str = "入职日期格式必须是 yyyy-MM-dd";

fn type_mismatch(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("typeMismatch");
    err.message = Some(Cow::Borrowed(message));
    err
}

/// 空串和缺省一样按 `None` 处理
fn parse_optional<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, T::Err> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

fn validate_d_id(value: &str) -> Result<(), ValidationError> {
    parse_optional::<i32>(Some(value))
        .map(|_| ())
        .map_err(|_| type_mismatch(D_ID_MISMATCH))
}

fn validate_hire_date(value: &str) -> Result<(), ValidationError> {
    parse_optional::<NaiveDate>(Some(value))
        .map(|_| ())
        .map_err(|_| type_mismatch(HIRE_DATE_MISMATCH))
}

impl EmployeeForm {
    /// 只应在 `validate()` 通过之后调用
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            emp_name: self.emp_name.unwrap_or_default(),
            gender: self.gender,
            email: self.email,
            d_id: parse_optional(self.d_id.as_deref()).unwrap_or(None),
            hire_date: parse_optional(self.hire_date.as_deref()).unwrap_or(None),
        }
    }
}

/// 修改员工的表单，字段都可以缺省
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub emp_name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub d_id: Option<String>,
    pub hire_date: Option<String>,
}

impl TryFrom<EmployeePatch> for EmployeeChanges {
    type Error = AppError;

    fn try_from(patch: EmployeePatch) -> Result<Self, Self::Error> {
        let d_id = parse_optional(patch.d_id.as_deref())
            .map_err(|_| AppError::MalformedInput(format!("dId: {}", D_ID_MISMATCH)))?;
        let hire_date = parse_optional(patch.hire_date.as_deref())
            .map_err(|_| AppError::MalformedInput(format!("hireDate: {}", HIRE_DATE_MISMATCH)))?;
        Ok(EmployeeChanges {
            emp_name: patch.emp_name,
            gender: patch.gender,
            email: patch.email,
            d_id,
            hire_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckUserParams {
    #[serde(rename = "empName")]
    pub emp_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    // 默认第 1 页
    pub pn: Option<i64>,
}

/// `/emp/{ids}` 中的 id 描述：`"3"` 或 `"1-2-3"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Single(i32),
    Batch(Vec<i32>),
}

impl FromStr for DeleteTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains('-') {
            return parse_id(s).map(DeleteTarget::Single);
        }

        // 末尾的空段忽略，`1-` 等同于 `[1]`
        let trimmed = s.trim_end_matches('-');
        if trimmed.is_empty() {
            return Err(AppError::MalformedInput(format!(
                "no employee id in `{}`",
                s
            )));
        }

        let mut ids = Vec::new();
        for segment in trimmed.split('-') {
            let id = parse_id(segment)?;
            // 同一请求里的 id 不重复
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(DeleteTarget::Batch(ids))
    }
}

fn parse_id(segment: &str) -> Result<i32, AppError> {
    segment
        .parse::<i32>()
        .map_err(|e| AppError::MalformedInput(format!("invalid employee id `{}`: {}", segment, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: Option<&str>, email: Option<&str>) -> EmployeeForm {
        EmployeeForm {
            emp_name: name.map(str::to_string),
            email: email.map(str::to_string),
            gender: Some("M".into()),
            d_id: Some("1".into()),
            hire_date: None,
        }
    }

    #[test]
    fn single_id() {
        assert_eq!("42".parse::<DeleteTarget>().unwrap(), DeleteTarget::Single(42));
    }

    #[test]
    fn batch_ids_keep_order() {
        assert_eq!(
            "3-1-2".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Batch(vec![3, 1, 2])
        );
    }

    #[test]
    fn batch_ids_collapse_duplicates() {
        assert_eq!(
            "1-2-1-2-5".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Batch(vec![1, 2, 5])
        );
    }

    #[test]
    fn trailing_hyphens_are_ignored() {
        assert_eq!("1-".parse::<DeleteTarget>().unwrap(), DeleteTarget::Batch(vec![1]));
        assert_eq!(
            "4-5--".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Batch(vec![4, 5])
        );
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for bad in ["1-a-3", "abc", "", "1--2", "-1", "-", "--", "99999999999"] {
            assert!(
                matches!(bad.parse::<DeleteTarget>(), Err(AppError::MalformedInput(_))),
                "`{}` should be rejected",
                bad
            );
        }
    }

    #[test]
    fn emp_name_patterns() {
        assert!(is_valid_emp_name("validUser123"));
        assert!(is_valid_emp_name("user_name-01"));
        assert!(is_valid_emp_name("张三"));
        assert!(is_valid_emp_name("欧阳娜娜子"));

        assert!(!is_valid_emp_name("abc"));
        assert!(!is_valid_emp_name("abcdefghijklmnopq"));
        assert!(!is_valid_emp_name("张"));
        assert!(!is_valid_emp_name("欧阳娜娜子子"));
        assert!(!is_valid_emp_name("张三abc"));
        assert!(!is_valid_emp_name("user name1"));
    }

    #[test]
    fn valid_form_passes() {
        assert!(form(Some("zhangsan01"), Some("zs@example.com")).validate().is_ok());
    }

    #[test]
    fn bad_email_reports_email_field() {
        let errors = form(Some("zhangsan01"), Some("not-an-email"))
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields["email"][0].message.as_deref(),
            Some("邮箱格式不正确")
        );
    }

    #[test]
    fn missing_name_is_required() {
        let errors = form(None, Some("zs@example.com")).validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["empName"][0].message.as_deref(),
            Some("用户名不能为空")
        );
    }

    #[test]
    fn blank_numeric_fields_become_none() {
        let mut input = form(Some("zhangsan01"), Some("zs@example.com"));
        input.d_id = Some(String::new());
        input.hire_date = Some("  ".into());
        assert!(input.validate().is_ok());

        let emp = input.into_new_employee();
        assert_eq!(emp.d_id, None);
        assert_eq!(emp.hire_date, None);
    }

    #[test]
    fn unparsable_fields_are_field_errors() {
        let mut input = form(Some("zhangsan01"), Some("zs@example.com"));
        input.d_id = Some("abc".into());
        input.hire_date = Some("2024-13-01".into());

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["dId"][0].message.as_deref(), Some(D_ID_MISMATCH));
        assert_eq!(
            fields["hireDate"][0].message.as_deref(),
            Some(HIRE_DATE_MISMATCH)
        );
    }

    #[test]
    fn parsed_fields_reach_new_employee() {
        let mut input = form(Some("zhangsan01"), Some("zs@example.com"));
        input.hire_date = Some("2024-03-01".into());

        let emp = input.into_new_employee();
        assert_eq!(emp.d_id, Some(1));
        assert_eq!(emp.hire_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn patch_with_bad_number_is_malformed() {
        let patch = EmployeePatch {
            d_id: Some("x1".into()),
            ..Default::default()
        };
        assert!(matches!(
            EmployeeChanges::try_from(patch),
            Err(AppError::MalformedInput(_))
        ));

        let blank = EmployeePatch {
            d_id: Some(String::new()),
            gender: Some("F".into()),
            ..Default::default()
        };
        let changes = EmployeeChanges::try_from(blank).unwrap();
        assert_eq!(changes.d_id, None);
        assert_eq!(changes.gender.as_deref(), Some("F"));
    }
}
