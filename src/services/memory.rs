//! In-memory implementation of [`Store`].
//!
//! Mirrors the Postgres adapter's row semantics (multi-row updates, filter
//! bounds, ordering) so the cache and workflow can run without a database.
//! Used by the test suite and by `database.backend = "memory"`.

use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Page, Passport, PersonInfo, Task, TaskInstance, UserFilter, UserProfile};
use super::store::Store;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, UserProfile>,
    tasks: BTreeMap<i32, String>,
    // Insertion order is preserved, like a heap table without ORDER BY
    instances: Vec<TaskInstance>,
    next_user_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given catalog tasks.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tables = Tables {
            tasks: tasks.into_iter().map(|t| (t.id_task, t.task_name)).collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Number of task instance rows held for `user_id`.
    pub async fn instance_count(&self, user_id: i32) -> usize {
        self.tables
            .read()
            .await
            .instances
            .iter()
            .filter(|i| i.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, passport: Passport, info: &PersonInfo) -> StoreResult<i32> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.passport() == passport) {
            return Err(StoreError::Conflict(format!("passport {} already enrolled", passport)));
        }
        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.insert(id, UserProfile::new(id, passport, info.clone()));
        Ok(id)
    }

    async fn insert_task_instance(&self, instance: &TaskInstance) -> StoreResult<TaskInstance> {
        self.tables.write().await.instances.push(instance.clone());
        Ok(instance.clone())
    }

    async fn update_task_instance_end_time(
        &self,
        user_id: i32,
        task_id: i32,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut touched = 0;
        for instance in tables
            .instances
            .iter_mut()
            .filter(|i| i.user_id == user_id && i.id_task == task_id)
        {
            instance.end_time = Some(now);
            touched += 1;
        }
        Ok(touched)
    }

    async fn update_task_instance_total_minutes(
        &self,
        user_id: i32,
        task_id: i32,
        minutes: i32,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut touched = 0;
        for instance in tables
            .instances
            .iter_mut()
            .filter(|i| i.user_id == user_id && i.id_task == task_id)
        {
            instance.total_minutes = minutes;
            touched += 1;
        }
        Ok(touched)
    }

    async fn get_task_instance(&self, user_id: i32, task_id: i32) -> StoreResult<TaskInstance> {
        self.tables
            .read()
            .await
            .instances
            .iter()
            .filter(|i| i.user_id == user_id && i.id_task == task_id)
            .max_by_key(|i| i.start_time)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("task {} for user {}", task_id, user_id)))
    }

    async fn get_task_name(&self, task_id: i32) -> StoreResult<String> {
        self.tables
            .read()
            .await
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("task {}", task_id)))
    }

    async fn list_users(&self) -> StoreResult<Vec<UserProfile>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn list_users_filtered(&self, filter: &UserFilter, page: Page) -> StoreResult<Vec<UserProfile>> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(0);

        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .filter(|u| filter.matches(u))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_task_instances_for_user(&self, user_id: i32) -> StoreResult<Vec<TaskInstance>> {
        let mut instances: Vec<TaskInstance> = self
            .tables
            .read()
            .await
            .instances
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        instances.sort_by_key(|i| i.start_time);
        Ok(instances)
    }

    async fn list_task_instances_filtered(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<TaskInstance>> {
        let mut instances: Vec<TaskInstance> = self
            .tables
            .read()
            .await
            .instances
            .iter()
            .filter(|i| i.user_id == user_id && i.start_time >= start)
            .filter(|i| i.end_time.map_or(true, |e| e <= end))
            .cloned()
            .collect();
        instances.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
        Ok(instances)
    }

    async fn delete_user_and_instances(&self, user_id: i32) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        tables.instances.retain(|i| i.user_id != user_id);
        Ok(u64::from(tables.users.remove(&user_id).is_some()))
    }

    async fn update_user_profile(&self, profile: &UserProfile) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let passport = profile.passport();
        if tables.users.values().any(|u| u.id != profile.id && u.passport() == passport) {
            return Err(StoreError::Conflict(format!("passport {} already enrolled", passport)));
        }
        match tables.users.get_mut(&profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
