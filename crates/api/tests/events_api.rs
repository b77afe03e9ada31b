//! HTTP-level integration tests for the `/api/events` endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    build_test_app, build_test_app_with, delete, expect_status, get, post_json, put_json,
    recording_sync, test_config, CalendarCall, RecordingCalendar, MOCK_EVENT_ID,
};
use serde_json::json;
use sqlx::PgPool;

fn event(title: &str, date: &str, time: &str) -> serde_json::Value {
    json!({ "title": title, "date": date, "time": time })
}

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(build_test_app(pool.clone()), "/api/events", body).await;
    expect_status(response, StatusCode::CREATED).await["event"].clone()
}

fn titles(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/events",
        event("Client call", "2024-03-15", "10:00"),
    )
    .await;
    let json = expect_status(response, StatusCode::CREATED).await;

    assert_eq!(json["message"], "Event created successfully");
    let e = &json["event"];
    assert_eq!(e["type"], "meeting");
    assert_eq!(e["status"], "scheduled");
    assert_eq!(e["date"], "2024-03-15T00:00:00Z");
    assert_eq!(e["time"], "10:00");
    assert_eq!(e["attendees"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_fields(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/events",
        json!({"title": "", "date": "someday", "time": "9:5", "type": "party"}),
    )
    .await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    let messages: Vec<&str> = json["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Title is required"));
    assert!(messages.contains(&"Valid date is required"));
    assert!(messages.contains(&"Time must be in HH:MM 24-hour format"));
    assert!(messages.iter().any(|m| m.starts_with("type must be one of")));

    let response = post_json(
        build_test_app(pool),
        "/api/events",
        json!({"title": "x", "date": "2024-03-15", "time": "10:00", "attendees": "Ana"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn month_filter_selects_calendar_month_sorted_by_time(pool: PgPool) {
    create(&pool, event("Afternoon", "2024-03-15", "14:00")).await;
    create(&pool, event("Morning", "2024-03-15", "09:30")).await;
    create(&pool, event("Earlier day", "2024-03-02", "16:00")).await;
    create(&pool, event("February", "2024-02-10", "10:00")).await;
    create(&pool, event("April", "2024-04-10", "10:00")).await;

    let response = get(build_test_app(pool.clone()), "/api/events?month=3&year=2024").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(titles(&json), vec!["Earlier day", "Morning", "Afternoon"]);

    // Month without year is ignored.
    let response = get(build_test_app(pool.clone()), "/api/events?month=3").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(titles(&json).len(), 5);

    let response = get(build_test_app(pool.clone()), "/api/events?date=2024-03-15").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(titles(&json), vec!["Morning", "Afternoon"]);

    let response = get(build_test_app(pool), "/api/events?year=2023").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert!(titles(&json).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_filters_are_rejected(pool: PgPool) {
    for query in ["month=13&year=2024", "year=1999", "date=not-a-date", "status=done"] {
        let response = get(build_test_app(pool.clone()), &format!("/api/events?{query}")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {query}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_get_delete(pool: PgPool) {
    let created = create(&pool, event("Hearing", "2024-05-20", "11:00")).await;
    let uri = format!("/api/events/{}", created["_id"].as_str().unwrap());

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({"status": "completed", "location": "Room 4"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Event updated successfully");
    assert_eq!(json["event"]["status"], "completed");
    assert_eq!(json["event"]["location"], "Room 4");
    assert_eq!(json["event"]["time"], "11:00");

    let response = get(build_test_app(pool.clone()), &uri).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["title"], "Hearing");

    let response = delete(build_test_app(pool.clone()), &uri).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Event deleted successfully");

    let response = get(build_test_app(pool), &uri).await;
    let json = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["error"], "Event not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_waits_for_calendar_mirror(pool: PgPool) {
    let provider = Arc::new(RecordingCalendar::default());
    let app = || {
        build_test_app_with(
            pool.clone(),
            test_config(std::env::temp_dir()),
            recording_sync(provider.clone()),
        )
    };

    let mut body = event("Hearing", "2024-05-20", "11:00");
    body["type"] = json!("court");
    let response = post_json(app(), "/api/events", body).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["event"]["googleCalendarEventId"], MOCK_EVENT_ID);

    let uri = format!("/api/events/{}", json["event"]["_id"].as_str().unwrap());
    let response = put_json(app(), &uri, json!({"title": "Hearing (moved)"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = delete(app(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        provider.calls(),
        vec![
            CalendarCall::Create {
                summary: "⏰ Hearing".into()
            },
            CalendarCall::Update {
                id: MOCK_EVENT_ID.into(),
                summary: "⏰ Hearing (moved)".into()
            },
            CalendarCall::Delete {
                id: MOCK_EVENT_ID.into()
            },
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_mirror_still_creates_event(pool: PgPool) {
    let provider = Arc::new(RecordingCalendar::failing());
    let app = build_test_app_with(
        pool,
        test_config(std::env::temp_dir()),
        recording_sync(provider.clone()),
    );

    let response = post_json(app, "/api/events", event("Call", "2024-05-20", "11:00")).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    assert!(json["event"].get("googleCalendarEventId").is_none());
    assert_eq!(provider.calls().len(), 1);
}
