use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use crate::errors::{AppError, AppResult};
use crate::models::{SummaryQuery, TaskInstance, TaskRequest};
use crate::state::AppState;
use super::parse_param;

pub async fn start_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> AppResult<Json<TaskInstance>> {
    tracing::debug!("Start task request: {:?}", request);
    let instance = state.timer.start(request.user_id, request.id_task).await?;
    Ok(Json(instance))
}

pub async fn end_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> AppResult<Json<TaskInstance>> {
    tracing::debug!("End task request: {:?}", request);
    let instance = state.timer.end(request.user_id, request.id_task).await?;
    Ok(Json(instance))
}

// Reads straight from the store; the cache is not consulted
pub async fn get_task_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Vec<TaskInstance>>> {
    tracing::info!(
        "Task summary requested: user_id={:?} start_date={:?} end_date={:?}",
        query.user_id, query.start_date, query.end_date
    );

    let user_id: i32 = parse_param("user_id", query.user_id.as_deref())?;
    let start_date: NaiveDate = parse_param("start_date", query.start_date.as_deref())?;
    let end_date: NaiveDate = parse_param("end_date", query.end_date.as_deref())?;

    let summaries = state
        .store
        .list_task_instances_filtered(user_id, midnight_utc(start_date), midnight_utc(end_date))
        .await
        .map_err(|e| {
            tracing::error!("Task summary query failed for user {}: {}", user_id, e);
            AppError::Store(e)
        })?;

    tracing::info!("Returning {} task summaries for user {}", summaries.len(), user_id);
    Ok(Json(summaries))
}

// Dates are YYYY-MM-DD and bound at 00:00 UTC
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
