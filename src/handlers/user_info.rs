use std::sync::Arc;
use axum::{
    extract::{Query, State},
    response::Json,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Passport, PassportQuery, PersonInfo};
use crate::services::PassportDirectory;
use super::parse_param;

pub async fn get_user_info(
    State(directory): State<Arc<PassportDirectory>>,
    Query(query): Query<PassportQuery>,
) -> AppResult<Json<PersonInfo>> {
    let passport = Passport::new(
        parse_param("passportSerie", query.passport_serie.as_deref())?,
        parse_param("passportNumber", query.passport_number.as_deref())?,
    );

    let info = directory.lookup(passport).cloned().ok_or_else(|| {
        tracing::debug!("No user with passport {}", passport);
        AppError::NotFound(format!("No user with passport {}", passport))
    })?;

    tracing::info!("Resolved passport {}", passport);
    Ok(Json(info))
}
