mod user;
mod task;
mod user_info;

pub use user::{add_user, list_users, update_user, delete_user, get_user_tasks};
pub use task::{start_task, end_task, get_task_summary};
pub use user_info::get_user_info;

use std::str::FromStr;
use crate::errors::{AppError, AppResult};

// Parses a required query parameter, naming it in the error
fn parse_param<T>(name: &str, value: Option<&str>) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing parameter '{}'", name)))?;

    value.parse().map_err(|e| {
        AppError::InvalidInput(format!("Invalid value '{}' for '{}': {}", value, name, e))
    })
}

// Same as parse_param but an absent or empty value is None
fn parse_optional_param<T>(name: &str, value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.filter(|v| !v.is_empty()) {
        Some(v) => parse_param(name, Some(v)).map(Some),
        None => Ok(None),
    }
}
