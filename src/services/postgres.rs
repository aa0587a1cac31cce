//! `PostgreSQL` implementation of [`Store`] using `sqlx`.
//!
//! Schema lives in `migrations/` and is applied on connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use crate::config::DatabaseConfig;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Page, Passport, PersonInfo, TaskInstance, UserFilter, UserProfile};
use super::store::Store;

const USER_COLUMNS: &str =
    "id, passport_serie, passport_number, surname, name, patronymic, address";
const INSTANCE_COLUMNS: &str =
    "user_id, id_task, task_name, start_time, end_time, total_minutes";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and runs pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Connected to database and applied migrations");

        Ok(Self::new(pool))
    }
}

// The only unique constraint on users is the passport pair
fn passport_conflict(error: sqlx::Error, passport: Passport) -> StoreError {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("passport {} already enrolled", passport))
        }
        e => StoreError::Database(e),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, passport: Passport, info: &PersonInfo) -> StoreResult<i32> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO users (passport_serie, passport_number, surname, name, patronymic, address) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(passport.serie)
        .bind(passport.number)
        .bind(&info.surname)
        .bind(&info.name)
        .bind(&info.patronymic)
        .bind(&info.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| passport_conflict(e, passport))?;

        Ok(id)
    }

    async fn insert_task_instance(&self, instance: &TaskInstance) -> StoreResult<TaskInstance> {
        let query = format!(
            "INSERT INTO users_tasks ({INSTANCE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {INSTANCE_COLUMNS}"
        );

        let persisted = sqlx::query_as::<_, TaskInstance>(&query)
            .bind(instance.user_id)
            .bind(instance.id_task)
            .bind(&instance.task_name)
            .bind(instance.start_time)
            .bind(instance.end_time)
            .bind(instance.total_minutes)
            .fetch_one(&self.pool)
            .await?;

        Ok(persisted)
    }

    async fn update_task_instance_end_time(
        &self,
        user_id: i32,
        task_id: i32,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users_tasks SET end_time = $1 WHERE user_id = $2 AND id_task = $3",
        )
        .bind(now)
        .bind(user_id)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_task_instance_total_minutes(
        &self,
        user_id: i32,
        task_id: i32,
        minutes: i32,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users_tasks SET total_minutes = $1 WHERE user_id = $2 AND id_task = $3",
        )
        .bind(minutes)
        .bind(user_id)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_task_instance(&self, user_id: i32, task_id: i32) -> StoreResult<TaskInstance> {
        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM users_tasks \
             WHERE user_id = $1 AND id_task = $2 \
             ORDER BY start_time DESC \
             LIMIT 1"
        );

        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(user_id)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("task {} for user {}", task_id, user_id))
            })
    }

    async fn get_task_name(&self, task_id: i32) -> StoreResult<String> {
        let row: Option<(String,)> = sqlx::query_as("SELECT task_name FROM tasks WHERE id_task = $1")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(name,)| name)
            .ok_or_else(|| StoreError::NotFound(format!("task {}", task_id)))
    }

    async fn list_users(&self) -> StoreResult<Vec<UserProfile>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let users = sqlx::query_as::<_, UserProfile>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_users_filtered(&self, filter: &UserFilter, page: Page) -> StoreResult<Vec<UserProfile>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));

        if let Some(serie) = filter.passport_serie {
            builder.push(" AND passport_serie = ").push_bind(serie);
        }
        if let Some(number) = filter.passport_number {
            builder.push(" AND passport_number = ").push_bind(number);
        }
        for (column, value) in [
            ("surname", &filter.surname),
            ("name", &filter.name),
            ("patronymic", &filter.patronymic),
            ("address", &filter.address),
        ] {
            if let Some(value) = value {
                builder
                    .push(format!(" AND {} ILIKE ", column))
                    .push_bind(format!("%{}%", value));
            }
        }

        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        tracing::debug!("Listing users: {}", builder.sql());
        let users = builder
            .build_query_as::<UserProfile>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_task_instances_for_user(&self, user_id: i32) -> StoreResult<Vec<TaskInstance>> {
        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM users_tasks WHERE user_id = $1 ORDER BY start_time"
        );
        let instances = sqlx::query_as::<_, TaskInstance>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    async fn list_task_instances_filtered(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<TaskInstance>> {
        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM users_tasks \
             WHERE user_id = $1 \
               AND start_time >= $2 \
               AND (end_time <= $3 OR end_time IS NULL) \
             ORDER BY total_minutes DESC"
        );
        let instances = sqlx::query_as::<_, TaskInstance>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    async fn delete_user_and_instances(&self, user_id: i32) -> StoreResult<u64> {
        let mut transaction = self.pool.begin().await?;

        sqlx::query("DELETE FROM users_tasks WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *transaction)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(result.rows_affected())
    }

    async fn update_user_profile(&self, profile: &UserProfile) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users \
             SET passport_serie = $2, passport_number = $3, surname = $4, \
                 name = $5, patronymic = $6, address = $7 \
             WHERE id = $1",
        )
        .bind(profile.id)
        .bind(profile.passport_serie)
        .bind(profile.passport_number)
        .bind(&profile.surname)
        .bind(&profile.name)
        .bind(&profile.patronymic)
        .bind(&profile.address)
        .execute(&self.pool)
        .await
        .map_err(|e| passport_conflict(e, profile.passport()))?;

        Ok(result.rows_affected())
    }
}
