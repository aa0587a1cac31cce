//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use time_tracker::cache::Cache;
use time_tracker::errors::{UserInfoError, UserInfoResult};
use time_tracker::models::{Passport, PersonInfo, Task};
use time_tracker::routes;
use time_tracker::services::{MemoryStore, UserInfoLookup};
use time_tracker::state::AppState;

/// Identity lookup answering from a fixed map.
pub struct StubUserInfo {
    people: HashMap<Passport, PersonInfo>,
}

impl StubUserInfo {
    pub fn new() -> Self {
        let mut people = HashMap::new();
        people.insert(
            Passport::new(1234, 567890),
            PersonInfo {
                surname: "Vadimov".into(),
                name: "Vadim".into(),
                patronymic: "Vadimovich".into(),
                address: "Moscow".into(),
            },
        );
        Self { people }
    }
}

#[async_trait]
impl UserInfoLookup for StubUserInfo {
    async fn lookup(&self, passport: Passport) -> UserInfoResult<PersonInfo> {
        self.people
            .get(&passport)
            .cloned()
            .ok_or_else(|| UserInfoError::NotFound(passport.to_string()))
    }
}

pub struct TestApp {
    pub store: MemoryStore,
    pub cache: Arc<Cache>,
    pub state: AppState,
    pub router: Router,
}

pub async fn test_app() -> TestApp {
    let store = MemoryStore::with_tasks([
        Task { id_task: 1, task_name: "Coding".into() },
        Task { id_task: 3, task_name: "Design Review".into() },
    ]);
    let cache = Arc::new(Cache::new());
    cache.load_all(&store).await.unwrap();

    let state = AppState::new(Arc::new(store.clone()), cache.clone(), Arc::new(StubUserInfo::new()));
    let router = routes::router(state.clone(), 64 * 1024, Duration::from_secs(5));

    TestApp { store, cache, state, router }
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn json(&self, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = self.request(method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    /// Enrolls the stub's known passport and returns the new user id.
    pub async fn enroll(&self) -> i64 {
        let (status, body) = self
            .json("POST", "/users", Some(serde_json::json!({ "passportNumber": "1234 567890" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body.as_i64().unwrap()
    }
}
