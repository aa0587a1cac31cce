//! Start/stop workflow for task timers.
//!
//! Every step writes the store first and the cache second. There is no
//! rollback across the pair: a failure after the store write leaves the store
//! ahead of the cache until the next [`Cache::load_all`].

use std::sync::Arc;
use chrono::Utc;
use crate::cache::Cache;
use crate::errors::{AppError, AppResult};
use crate::models::{minutes_between, Task, TaskInstance};
use super::store::Store;

#[derive(Clone)]
pub struct TaskTimer {
    store: Arc<dyn Store>,
    cache: Arc<Cache>,
}

impl TaskTimer {
    pub fn new(store: Arc<dyn Store>, cache: Arc<Cache>) -> Self {
        Self { store, cache }
    }

    /// Starts a timer for `(user_id, task_id)` and returns the new instance.
    ///
    /// Not idempotent: each call inserts a new row and appends a new cache
    /// entry, even while an earlier instance of the same task is running.
    pub async fn start(&self, user_id: i32, task_id: i32) -> AppResult<TaskInstance> {
        let task_name = self.store.get_task_name(task_id).await.map_err(|e| {
            tracing::error!("Failed to look up task {}: {}", task_id, e);
            e
        })?;
        let task = Task { id_task: task_id, task_name };

        let instance = self
            .store
            .insert_task_instance(&TaskInstance::started(user_id, &task, Utc::now()))
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert task {} for user {}: {}", task_id, user_id, e);
                e
            })?;
        tracing::debug!("Persisted task instance: {:?}", instance);

        self.cache.put_task(task).await;

        // The store row stays even if the user is missing from the cache
        if !self.cache.append_task_instance(user_id, instance.clone()).await {
            tracing::warn!("User {} not in cache, task {} started in store only", user_id, task_id);
            return Err(AppError::NotFound(format!("User {} not found in cache", user_id)));
        }

        tracing::info!("Started task {} for user {}", task_id, user_id);
        Ok(instance)
    }

    /// Stops the timer for `(user_id, task_id)` and returns the stored row with
    /// its computed duration.
    ///
    /// The end time is written to every stored row of the pair, while the cache
    /// only updates its first matching entry and takes its own timestamp.
    pub async fn end(&self, user_id: i32, task_id: i32) -> AppResult<TaskInstance> {
        let touched = self
            .store
            .update_task_instance_end_time(user_id, task_id, Utc::now())
            .await?;
        tracing::debug!("Stamped end time on {} rows for user {} task {}", touched, user_id, task_id);

        let mut instance = self.store.get_task_instance(user_id, task_id).await.map_err(|e| {
            tracing::warn!("No stored instance of task {} for user {}: {}", task_id, user_id, e);
            e
        })?;

        if let Some(end_time) = instance.end_time {
            instance.total_minutes = minutes_between(instance.start_time, end_time);
            self.store
                .update_task_instance_total_minutes(user_id, task_id, instance.total_minutes)
                .await?;
            tracing::debug!("Task {} for user {} took {} minutes", task_id, user_id, instance.total_minutes);
        }

        if !self
            .cache
            .finish_task_instance(user_id, task_id, Utc::now(), instance.total_minutes)
            .await
        {
            tracing::warn!("User {} not in cache, task {} ended in store only", user_id, task_id);
            return Err(AppError::NotFound(format!("User {} not found in cache", user_id)));
        }

        tracing::info!("Ended task {} for user {}", task_id, user_id);
        Ok(instance)
    }
}
