//! In-memory mirror of the store's users and catalog tasks.
//!
//! Two maps, each behind its own reader/writer lock:
//!
//! - `users`: user id -> [`User`], which embeds the user's task instances;
//! - `tasks`: task id -> catalog [`Task`].
//!
//! No operation ever holds both locks, so nothing may assume a read of a user
//! and a catalog entry is atomic. Task names are copied into each instance
//! when its timer starts and are never re-joined from `tasks`, which is what
//! makes that acceptable. If joint atomicity is ever needed, merge the maps
//! under one lock instead of introducing a lock order.
//!
//! The store stays authoritative. The cache is rebuilt by [`Cache::load_all`]
//! and every lock is held only for in-memory map work, never across store I/O.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use crate::errors::StoreResult;
use crate::models::{Task, TaskInstance, User, UserProfile};
use crate::services::Store;

#[derive(Debug, Default)]
pub struct Cache {
    users: RwLock<HashMap<i32, User>>,
    tasks: RwLock<HashMap<i32, Task>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both maps. Used before a reload.
    pub async fn initialize(&self) {
        self.users.write().await.clear();
        self.tasks.write().await.clear();
    }

    /// Cold load: resets the cache, then copies every user and all of their
    /// task instances from the store.
    ///
    /// Meant to finish before the listener accepts traffic. Any store error is
    /// returned as-is and leaves the cache partially filled; startup treats it
    /// as fatal.
    pub async fn load_all(&self, store: &dyn Store) -> StoreResult<usize> {
        self.initialize().await;

        let profiles = store.list_users().await?;
        let count = profiles.len();

        for profile in profiles {
            let tasks = store.list_task_instances_for_user(profile.id).await?;
            tracing::debug!("Loaded {} task instances for user {}", tasks.len(), profile.id);
            self.put_user(User::new(profile, tasks)).await;
        }

        tracing::info!("Cache warmed with {} users", count);
        Ok(count)
    }

    /// Inserts or replaces the entry for `user.id()`.
    pub async fn put_user(&self, user: User) {
        self.users.write().await.insert(user.id(), user);
    }

    /// Inserts or replaces a catalog entry. Independent of the user lock.
    pub async fn put_task(&self, task: Task) {
        self.tasks.write().await.insert(task.id_task, task);
    }

    pub async fn get_user(&self, user_id: i32) -> Option<User> {
        self.users.read().await.get(&user_id).cloned()
    }

    pub async fn get_task(&self, task_id: i32) -> Option<Task> {
        self.tasks.read().await.get(&task_id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Copy of the user's task instances ordered by `total_minutes`, largest
    /// first. `None` when the user is not cached.
    ///
    /// The sort is stable, but insertion order carries no meaning, so callers
    /// must not rely on the relative order of equal durations.
    pub async fn get_user_tasks_sorted(&self, user_id: i32) -> Option<Vec<TaskInstance>> {
        let mut tasks = self.users.read().await.get(&user_id)?.tasks.clone();
        tasks.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
        Some(tasks)
    }

    /// Appends a started instance to the user's list. Returns `false` if the
    /// user is not cached.
    pub async fn append_task_instance(&self, user_id: i32, instance: TaskInstance) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(user) => {
                user.tasks.push(instance);
                true
            }
            None => false,
        }
    }

    /// Stamps the first cached instance of `task_id` for the user with the end
    /// time and duration.
    ///
    /// Only the first match is touched; older duplicates of the same task stay
    /// as they were. Returns `false` if the user is not cached; a user without
    /// a matching instance is left unchanged and still returns `true`.
    pub async fn finish_task_instance(
        &self,
        user_id: i32,
        task_id: i32,
        end_time: DateTime<Utc>,
        total_minutes: i32,
    ) -> bool {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&user_id) else {
            return false;
        };

        if let Some(instance) = user.tasks.iter_mut().find(|t| t.id_task == task_id) {
            instance.end_time = Some(end_time);
            instance.total_minutes = total_minutes;
        } else {
            tracing::debug!("No cached instance of task {} for user {}", task_id, user_id);
        }
        true
    }

    /// Replaces the profile fields of a cached user, keeping its task list.
    /// Returns `false` (and changes nothing) if the user is not cached.
    pub async fn update_profile(&self, profile: UserProfile) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(&profile.id) {
            Some(user) => {
                user.profile = profile;
                true
            }
            None => false,
        }
    }

    pub async fn remove_user(&self, user_id: i32) -> Option<User> {
        self.users.write().await.remove(&user_id)
    }
}
