//! The relational store contract.
//!
//! The store is the source of truth for users and task instances. The cache
//! and the timer workflow only talk to it through this trait, so the Postgres
//! adapter and the in-memory adapter are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::errors::StoreResult;
use crate::models::{Page, Passport, PersonInfo, TaskInstance, UserFilter, UserProfile};

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new user and returns the identifier the store assigned.
    async fn insert_user(&self, passport: Passport, info: &PersonInfo) -> StoreResult<i32>;

    /// Inserts a task instance row and returns it as persisted.
    async fn insert_task_instance(&self, instance: &TaskInstance) -> StoreResult<TaskInstance>;

    /// Stamps `end_time` on every row for `(user_id, task_id)`.
    /// Returns the number of rows touched; zero is not an error.
    async fn update_task_instance_end_time(
        &self,
        user_id: i32,
        task_id: i32,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Sets `total_minutes` on every row for `(user_id, task_id)`.
    async fn update_task_instance_total_minutes(
        &self,
        user_id: i32,
        task_id: i32,
        minutes: i32,
    ) -> StoreResult<u64>;

    /// Reads the most recently started row for `(user_id, task_id)`.
    async fn get_task_instance(&self, user_id: i32, task_id: i32) -> StoreResult<TaskInstance>;

    /// Looks up a catalog task's display name.
    async fn get_task_name(&self, task_id: i32) -> StoreResult<String>;

    async fn list_users(&self) -> StoreResult<Vec<UserProfile>>;

    async fn list_users_filtered(&self, filter: &UserFilter, page: Page) -> StoreResult<Vec<UserProfile>>;

    async fn list_task_instances_for_user(&self, user_id: i32) -> StoreResult<Vec<TaskInstance>>;

    /// Rows with `start_time >= start` and `end_time <= end` (open rows always
    /// qualify on the upper bound), ordered by `total_minutes` descending.
    async fn list_task_instances_filtered(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<TaskInstance>>;

    /// Removes the user's task instances, then the user. Returns the number of
    /// user rows deleted.
    async fn delete_user_and_instances(&self, user_id: i32) -> StoreResult<u64>;

    /// Overwrites the profile fields of `profile.id`. Returns rows affected.
    async fn update_user_profile(&self, profile: &UserProfile) -> StoreResult<u64>;
}
