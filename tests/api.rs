//! End-to-end tests driving the router against the in-memory store.

mod common;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use common::test_app;
use time_tracker::services::Store;

#[rstest]
#[tokio::test]
async fn enrolling_a_user_writes_store_then_cache() {
    let app = test_app().await;

    let user_id = app.enroll().await as i32;

    let stored = app.store.list_users().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].surname, "Vadimov");
    assert_eq!(app.cache.get_user(user_id).await.unwrap().profile, stored[0]);
}

#[rstest]
#[case("1234567890")]
#[case("12 34 56")]
#[case("abcd 567890")]
#[tokio::test]
async fn malformed_passport_is_rejected(#[case] passport: &str) {
    let app = test_app().await;

    let (status, _) = app
        .request("POST", "/users", Some(json!({ "passportNumber": passport })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.list_users().await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_passport_is_not_found() {
    let app = test_app().await;

    let (status, _) = app
        .request("POST", "/users", Some(json!({ "passportNumber": "9999 999999" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn enrolling_the_same_passport_twice_is_a_conflict() {
    let app = test_app().await;
    let user_id = app.enroll().await as i32;

    let (status, _) = app
        .request("POST", "/users", Some(json!({ "passportNumber": "1234 567890" })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.store.list_users().await.unwrap().len(), 1);
    assert_eq!(app.cache.user_count().await, 1);
    assert!(app.cache.get_user(user_id).await.is_some());
}

#[rstest]
#[tokio::test]
async fn start_then_end_task_round_trip() {
    let app = test_app().await;
    let user_id = app.enroll().await;

    let (status, started) = app
        .json("POST", "/tasks/start", Some(json!({ "user_id": user_id, "id_task": 3 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["id_user"], user_id);
    assert_eq!(started["task_name"], "Design Review");
    assert!(started["end_time"].is_null());
    assert_eq!(started["total_minutes"], 0);

    let (status, ended) = app
        .json("POST", "/tasks/end", Some(json!({ "user_id": user_id, "id_task": 3 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ended["end_time"].is_null());
    assert_eq!(ended["total_minutes"], 0);

    let (status, tasks) = app.json("GET", &format!("/users/{}/tasks", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert!(!tasks[0]["end_time"].is_null());
}

#[rstest]
#[tokio::test]
async fn start_with_unknown_task_is_not_found() {
    let app = test_app().await;
    let user_id = app.enroll().await;

    let (status, _) = app
        .request("POST", "/tasks/start", Some(json!({ "user_id": user_id, "id_task": 77 })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn end_without_start_is_not_found() {
    let app = test_app().await;
    let user_id = app.enroll().await;

    let (status, _) = app
        .request("POST", "/tasks/end", Some(json!({ "user_id": user_id, "id_task": 1 })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn cached_tasks_for_unknown_user_is_not_found() {
    let app = test_app().await;

    let (status, _) = app.request("GET", "/users/404/tasks", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn summary_reads_the_store() {
    let app = test_app().await;
    let user_id = app.enroll().await;
    app.request("POST", "/tasks/start", Some(json!({ "user_id": user_id, "id_task": 1 })))
        .await;

    let today = chrono::Utc::now().date_naive();
    let tomorrow = today.succ_opt().unwrap();
    let uri = format!(
        "/tasks/summary?user_id={}&start_date={}&end_date={}",
        user_id, today, tomorrow
    );

    // Drop the cached copy: the summary must not depend on it
    app.cache.remove_user(user_id as i32).await;

    let (status, rows) = app.json("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["task_name"], "Coding");
}

#[rstest]
#[tokio::test]
async fn summary_without_rows_is_an_empty_list() {
    let app = test_app().await;

    let (status, rows) = app
        .json("GET", "/tasks/summary?user_id=5&start_date=2024-01-01&end_date=2024-02-01", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, json!([]));
}

#[rstest]
#[case("/tasks/summary?start_date=2024-01-01&end_date=2024-02-01")]
#[case("/tasks/summary?user_id=x&start_date=2024-01-01&end_date=2024-02-01")]
#[case("/tasks/summary?user_id=1&start_date=01.01.2024&end_date=2024-02-01")]
#[case("/tasks/summary?user_id=1&start_date=2024-01-01")]
#[tokio::test]
async fn summary_rejects_bad_parameters(#[case] uri: &str) {
    let app = test_app().await;

    let (status, _) = app.request("GET", uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn update_user_refreshes_cached_profile() {
    let app = test_app().await;
    let user_id = app.enroll().await;
    let body = json!({
        "passport_serie": 1234,
        "passport_number": 567890,
        "surname": "Renamed",
        "name": "Vadim",
        "patronymic": "Vadimovich",
        "address": "Kazan"
    });

    let (status, updated) = app.json("PUT", &format!("/users/{}", user_id), Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["surname"], "Renamed");
    let cached = app.cache.get_user(user_id as i32).await.unwrap();
    assert_eq!(cached.profile.address, "Kazan");
}

#[rstest]
#[tokio::test]
async fn update_of_uncached_user_only_touches_store() {
    let app = test_app().await;
    let user_id = app.enroll().await;
    app.cache.remove_user(user_id as i32).await;
    let body = json!({ "passport_serie": 1234, "passport_number": 567890, "surname": "StoreOnly" });

    let (status, _) = app.request("PUT", &format!("/users/{}", user_id), Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.cache.get_user(user_id as i32).await.is_none());
    assert_eq!(app.store.list_users().await.unwrap()[0].surname, "StoreOnly");
}

#[rstest]
#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let app = test_app().await;
    let body = json!({ "passport_serie": 1, "passport_number": 1 });

    let (status, _) = app.request("PUT", "/users/12", Some(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn deleted_user_is_not_resurrected_by_reload() {
    let app = test_app().await;
    let user_id = app.enroll().await;
    app.request("POST", "/tasks/start", Some(json!({ "user_id": user_id, "id_task": 1 })))
        .await;

    let (status, _) = app.request("DELETE", &format!("/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.instance_count(user_id as i32).await, 0);

    app.cache.load_all(&app.store).await.unwrap();
    assert!(app.cache.get_user(user_id as i32).await.is_none());

    let (status, _) = app.request("DELETE", &format!("/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn list_users_filters_and_validates_paging() {
    let app = test_app().await;
    app.enroll().await;

    let (status, users) = app.json("GET", "/users?surname=vadim&page=1&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (status, users) = app.json("GET", "/users?address=Paris", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));

    let (status, _) = app.request("GET", "/users?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, users) = app
        .json("GET", "/users?page=9223372036854775807&limit=10", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));
}

#[rstest]
#[tokio::test]
async fn sorted_tasks_come_back_longest_first() {
    let app = test_app().await;
    let user_id = app.enroll().await;
    for id_task in [1, 3, 1] {
        app.request("POST", "/tasks/start", Some(json!({ "user_id": user_id, "id_task": id_task })))
            .await;
    }
    // Make the first cached instance the longest
    app.cache
        .finish_task_instance(user_id as i32, 3, chrono::Utc::now(), 45)
        .await;

    let (status, tasks) = app.json("GET", &format!("/users/{}/tasks", user_id), None).await;

    assert_eq!(status, StatusCode::OK);
    let minutes: Vec<i64> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["total_minutes"].as_i64().unwrap())
        .collect();
    assert_eq!(minutes.len(), 3);
    assert_eq!(minutes[0], 45);
    assert!(minutes.windows(2).all(|w| w[0] >= w[1]));
}
