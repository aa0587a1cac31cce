use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

// Catalog entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    pub id_task: i32,
    pub task_name: String,
}

/// One user's timed run of a catalog task.
///
/// `end_time` stays `None` while the timer is running and `total_minutes`
/// stays 0 until the end time is recorded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskInstance {
    #[serde(rename = "id_user")]
    pub user_id: i32,
    pub id_task: i32,
    pub task_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_minutes: i32,
}

impl TaskInstance {
    pub fn started(user_id: i32, task: &Task, start_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            id_task: task.id_task,
            task_name: task.task_name.clone(),
            start_time,
            end_time: None,
            total_minutes: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

// Floors to whole minutes; saturates rather than overflowing i32
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let minutes = (end - start).num_seconds().div_euclid(60);
    i32::try_from(minutes).unwrap_or(if minutes < 0 { i32::MIN } else { i32::MAX })
}
