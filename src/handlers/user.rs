use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::errors::{AppError, AppResult};
use crate::models::{
    AddUserForm, Page, Passport, TaskInstance, UpdateUserForm, User, UserFilter, UserListQuery,
    UserProfile,
};
use crate::state::AppState;
use super::parse_optional_param;

pub async fn add_user(
    State(state): State<AppState>,
    Json(form): Json<AddUserForm>,
) -> AppResult<Response> {
    tracing::debug!("Received user input: {:?}", form);

    let passport: Passport = form.passport_number.parse().map_err(|e| {
        tracing::warn!("Invalid passport number format: {}", form.passport_number);
        AppError::InvalidInput(format!("Invalid passport number format: {}", e))
    })?;

    let info = state.user_info.lookup(passport).await?;

    let user_id = state.store.insert_user(passport, &info).await.map_err(|e| {
        tracing::error!("Failed to add user with passport {}: {}", passport, e);
        AppError::Store(e)
    })?;
    tracing::info!("User {} added to database", user_id);

    state
        .cache
        .put_user(User::new(UserProfile::new(user_id, passport, info), Vec::new()))
        .await;
    tracing::info!("User {} cached", user_id);

    Ok((StatusCode::CREATED, Json(user_id)).into_response())
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let filter = UserFilter {
        passport_serie: parse_optional_param("passport_serie", query.passport_serie.as_deref())?,
        passport_number: parse_optional_param("passport_number", query.passport_number.as_deref())?,
        surname: query.surname.filter(|s| !s.is_empty()),
        name: query.name.filter(|s| !s.is_empty()),
        patronymic: query.patronymic.filter(|s| !s.is_empty()),
        address: query.address.filter(|s| !s.is_empty()),
    };

    let defaults = Page::default();
    let page = Page {
        page: parse_optional_param("page", query.page.as_deref())?.unwrap_or(defaults.page),
        limit: parse_optional_param("limit", query.limit.as_deref())?.unwrap_or(defaults.limit),
    };
    if page.page < 1 || page.limit < 1 {
        return Err(AppError::InvalidInput("page and limit must be at least 1".into()));
    }

    tracing::debug!("Listing users with {:?} {:?}", filter, page);
    let users = state.store.list_users_filtered(&filter, page).await?;

    tracing::info!("Retrieved {} users", users.len());
    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(form): Json<UpdateUserForm>,
) -> AppResult<Json<UserProfile>> {
    let profile = UserProfile {
        id: user_id,
        passport_serie: form.passport_serie,
        passport_number: form.passport_number,
        surname: form.surname,
        name: form.name,
        patronymic: form.patronymic,
        address: form.address,
    };

    tracing::debug!("Updating user: {:?}", profile);
    let rows = state.store.update_user_profile(&profile).await?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    // A user missing from the cache is only reconciled by the next reload
    if !state.cache.update_profile(profile.clone()).await {
        tracing::debug!("User {} not found in cache, updated in store only", user_id);
    }

    tracing::info!("User {} updated", user_id);
    Ok(Json(profile))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    tracing::debug!("Deleting user {} and their tasks", user_id);

    let rows = state.store.delete_user_and_instances(user_id).await.map_err(|e| {
        tracing::error!("Failed to delete user {}: {}", user_id, e);
        AppError::Store(e)
    })?;
    state.cache.remove_user(user_id).await;

    if rows == 0 {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    tracing::info!("User {} and their tasks deleted", user_id);
    Ok(format!("User with ID {} and their tasks have been deleted", user_id).into_response())
}

pub async fn get_user_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<TaskInstance>>> {
    let tasks = state
        .cache
        .get_user_tasks_sorted(user_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    tracing::debug!("Returning {} cached tasks for user {}", tasks.len(), user_id);
    Ok(Json(tasks))
}

