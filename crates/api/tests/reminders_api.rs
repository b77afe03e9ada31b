//! HTTP-level integration tests for the `/api/reminders` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use common::{
    body_json, build_test_app, build_test_app_with, delete, expect_status, get, post_json,
    put_empty, put_json, recording_sync, test_config, CalendarCall, RecordingCalendar,
    MOCK_EVENT_ID,
};
use docket_api::sync::spawn_reminder_create;
use docket_db::repositories::ReminderRepo;
use serde_json::json;
use sqlx::PgPool;

const MISSING_ID: &str = "507f1f77bcf86cd799439011";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn motion() -> serde_json::Value {
    json!({
        "title": "File motion",
        "dueDate": "2024-06-01",
        "reminderDate": "2024-05-25",
        "category": "court"
    })
}

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(build_test_app(pool.clone()), "/api/reminders", body).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    json["reminder"].clone()
}

fn id_of(reminder: &serde_json::Value) -> String {
    reminder["_id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/reminders", motion()).await;
    let json = expect_status(response, StatusCode::CREATED).await;

    assert_eq!(json["message"], "Reminder created successfully");
    let reminder = &json["reminder"];
    assert_eq!(reminder["title"], "File motion");
    assert_eq!(reminder["status"], "active");
    assert_eq!(reminder["priority"], "medium");
    assert_eq!(reminder["type"], "manual");
    assert_eq!(reminder["description"], "");
    assert_eq!(reminder["dueDate"], "2024-06-01T00:00:00Z");
    assert_eq!(reminder["reminderDate"], "2024-05-25T00:00:00Z");
    assert_eq!(reminder["_id"].as_str().unwrap().len(), 24);
    assert!(reminder.get("documentId").is_none());
    assert!(reminder.get("googleCalendarEventId").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_collects_every_validation_message(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/reminders", json!({})).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(json["error"], "Validation Error");
    let messages: Vec<&str> = json["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Title is required"));
    assert!(messages.contains(&"Valid due date is required"));
    assert!(messages.contains(&"Valid reminder date is required"));
    assert!(messages.contains(&"Category is required"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_unknown_enum_and_bad_document_id(pool: PgPool) {
    let mut body = motion();
    body["priority"] = json!("critical");
    body["documentId"] = json!("not-an-id");

    let response = post_json(build_test_app(pool), "/api/reminders", body).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;

    let messages = json["messages"].as_array().unwrap();
    assert!(messages.iter().any(|m| m.as_str().unwrap().starts_with("priority must be one of")));
    assert!(messages.iter().any(|m| m == "Invalid document ID"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_document_id_is_dropped(pool: PgPool) {
    let mut body = motion();
    body["documentId"] = json!("");
    body["assignedTo"] = json!("");

    let reminder = create(&pool, body).await;
    assert!(reminder.get("documentId").is_none());
    assert!(reminder.get("assignedTo").is_none());

    let stored = ReminderRepo::find_by_id(&pool, &id_of(&reminder))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.document_id, None);
    assert_eq!(stored.assigned_to, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_a_bad_request(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;

    let request = Request::builder()
        .method("POST")
        .uri("/api/reminders")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let response = common::send(build_test_app(pool), request).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_by_id_and_not_found(pool: PgPool) {
    let reminder = create(&pool, motion()).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/reminders/{}", id_of(&reminder)),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["title"], "File motion");

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/reminders/{MISSING_ID}"),
    )
    .await;
    let json = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["error"], "Reminder not found");

    let response = get(build_test_app(pool), "/api/reminders/xyz").await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], "Invalid ID format");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_priority_and_status(pool: PgPool) {
    let urgent_late = json!({
        "title": "Late", "dueDate": "2024-09-01", "reminderDate": "2024-08-25",
        "category": "deadline", "priority": "urgent"
    });
    let urgent_early = json!({
        "title": "Early", "dueDate": "2024-07-01", "reminderDate": "2024-06-25",
        "category": "deadline", "priority": "urgent"
    });
    let urgent_dismissed = json!({
        "title": "Dismissed", "dueDate": "2024-06-01", "reminderDate": "2024-05-25",
        "category": "deadline", "priority": "urgent", "status": "dismissed"
    });
    let low = json!({
        "title": "Low", "dueDate": "2024-05-01", "reminderDate": "2024-04-25",
        "category": "client", "priority": "low"
    });
    for body in [urgent_late, urgent_early, urgent_dismissed, low] {
        create(&pool, body).await;
    }

    let response = get(
        build_test_app(pool.clone()),
        "/api/reminders?priority=urgent&status=active",
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Early", "Late"]);

    let response = get(build_test_app(pool.clone()), "/api/reminders?status=all&type=").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["title"], "Low");

    let response = get(build_test_app(pool), "/api/reminders?status=pending").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_query_string_gets_json_error_body(pool: PgPool) {
    for uri in [
        "/api/reminders?status=active&status=dismissed",
        "/api/events?year=2024&year=2025",
        "/api/documents?tag=a&tag=b",
    ] {
        let response = get(build_test_app(pool.clone()), uri).await;
        let json = expect_status(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(json["error"], "Validation Error", "uri {uri}");
        let message = json["messages"][0].as_str().unwrap();
        assert!(message.starts_with("Invalid query string"), "uri {uri}: {message}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn today_lists_active_reminders_due_today(pool: PgPool) {
    let now = Utc::now();
    let due_now = json!({
        "title": "Now", "dueDate": now.to_rfc3339(), "reminderDate": now.to_rfc3339(),
        "category": "meeting"
    });
    let later = (now + chrono::Duration::days(2)).to_rfc3339();
    let due_later = json!({
        "title": "Later", "dueDate": later, "reminderDate": later, "category": "meeting"
    });
    let dismissed = json!({
        "title": "Gone", "dueDate": now.to_rfc3339(), "reminderDate": now.to_rfc3339(),
        "category": "meeting", "status": "dismissed"
    });
    for body in [due_now, due_later, dismissed] {
        create(&pool, body).await;
    }

    let response = get(build_test_app(pool), "/api/reminders/today").await;
    let json = expect_status(response, StatusCode::OK).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Now"]);
}

// ---------------------------------------------------------------------------
// Update / dismiss / snooze / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_merges_supplied_fields(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let uri = format!("/api/reminders/{}", id_of(&reminder));

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({"priority": "high", "relatedCase": "2024/118"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Reminder updated successfully");
    assert_eq!(json["reminder"]["priority"], "high");
    assert_eq!(json["reminder"]["relatedCase"], "2024/118");
    assert_eq!(json["reminder"]["title"], "File motion");
    assert_eq!(json["reminder"]["category"], "court");

    let response = put_json(build_test_app(pool.clone()), &uri, json!({"title": "  "})).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["messages"][0], "Title is required");

    let response = put_json(
        build_test_app(pool),
        &format!("/api/reminders/{MISSING_ID}"),
        json!({"priority": "low"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dismiss_is_idempotent(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let uri = format!("/api/reminders/{}/dismiss", id_of(&reminder));

    for _ in 0..2 {
        let response = put_empty(build_test_app(pool.clone()), &uri).await;
        let json = expect_status(response, StatusCode::OK).await;
        assert_eq!(json["message"], "Reminder dismissed successfully");
        assert_eq!(json["reminder"]["status"], "dismissed");
    }

    let response = put_empty(
        build_test_app(pool),
        &format!("/api/reminders/{MISSING_ID}/dismiss"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn snooze_moves_reminder_date(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let uri = format!("/api/reminders/{}/snooze", id_of(&reminder));

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({"snoozeUntil": "2024-06-10"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Reminder snoozed successfully");
    assert_eq!(json["reminder"]["status"], "snoozed");
    assert_eq!(json["reminder"]["snoozeUntil"], "2024-06-10T00:00:00Z");
    assert_eq!(json["reminder"]["reminderDate"], "2024-06-10T00:00:00Z");

    let response = put_json(build_test_app(pool), &uri, json!({"snoozeUntil": "soon"})).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["messages"][0], "Valid snooze date is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn snooze_without_body_asks_for_date(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let uri = format!("/api/reminders/{}/snooze", id_of(&reminder));

    let response = put_empty(build_test_app(pool.clone()), &uri).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], "Validation Error");
    assert_eq!(json["messages"], json!(["Valid snooze date is required"]));

    let response = put_json(build_test_app(pool.clone()), &uri, json!({})).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["messages"], json!(["Valid snooze date is required"]));

    // The reminder is untouched.
    let response = get(build_test_app(pool), &format!("/api/reminders/{}", id_of(&reminder))).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["status"], "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_reminder(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let uri = format!("/api/reminders/{}", id_of(&reminder));

    let response = delete(build_test_app(pool.clone()), &uri).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Reminder deleted successfully");

    let response = delete(build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Calendar sync
// ---------------------------------------------------------------------------

async fn wait_for_external_ref(pool: &PgPool, id: &str) -> Option<String> {
    for _ in 0..50 {
        let stored = ReminderRepo::find_by_id(pool, id).await.unwrap().unwrap();
        if stored.external_event_ref.is_some() {
            return stored.external_event_ref;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    None
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_mirrors_in_background_and_records_ref(pool: PgPool) {
    let provider = Arc::new(RecordingCalendar::default());
    let app = || {
        build_test_app_with(
            pool.clone(),
            test_config(std::env::temp_dir()),
            recording_sync(provider.clone()),
        )
    };

    let response = post_json(app(), "/api/reminders", motion()).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    let id = id_of(&json["reminder"]);

    assert_eq!(
        wait_for_external_ref(&pool, &id).await.as_deref(),
        Some(MOCK_EVENT_ID)
    );
    assert_eq!(
        provider.calls(),
        vec![CalendarCall::Create {
            summary: "⏰ File motion".into()
        }]
    );

    // Mirrored reminders propagate updates and deletes.
    let uri = format!("/api/reminders/{id}");
    let response = put_json(app(), &uri, json!({"title": "File amended motion"})).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["reminder"]["googleCalendarEventId"], MOCK_EVENT_ID);

    let response = delete(app(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        provider.calls()[1..],
        [
            CalendarCall::Update {
                id: MOCK_EVENT_ID.into(),
                summary: "⏰ File amended motion".into()
            },
            CalendarCall::Delete {
                id: MOCK_EVENT_ID.into()
            },
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_failures_never_fail_requests(pool: PgPool) {
    let provider = Arc::new(RecordingCalendar::failing());
    let app = || {
        build_test_app_with(
            pool.clone(),
            test_config(std::env::temp_dir()),
            recording_sync(provider.clone()),
        )
    };

    let response = post_json(app(), "/api/reminders", motion()).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    let id = id_of(&json["reminder"]);

    // Wait for the background attempt, then confirm nothing was recorded.
    for _ in 0..50 {
        if !provider.calls().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(provider.calls().len(), 1);
    let stored = ReminderRepo::find_by_id(&pool, &id).await.unwrap().unwrap();
    assert_eq!(stored.external_event_ref, None);

    ReminderRepo::set_external_ref(&pool, &id, "stale-ref").await.unwrap();
    let response = delete(app(), &format!("/api/reminders/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ReminderRepo::find_by_id(&pool, &id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unconfigured_calendar_still_creates(pool: PgPool) {
    let response = post_json(build_test_app(pool.clone()), "/api/reminders", motion()).await;
    let json = expect_status(response, StatusCode::CREATED).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let stored = ReminderRepo::find_by_id(&pool, &id_of(&json["reminder"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.external_event_ref, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reminder_deleted_during_mirror_removes_calendar_event(pool: PgPool) {
    let reminder = create(&pool, motion()).await;
    let id = id_of(&reminder);
    let stored = ReminderRepo::find_by_id(&pool, &id).await.unwrap().unwrap();

    let response = delete(build_test_app(pool.clone()), &format!("/api/reminders/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let provider = Arc::new(RecordingCalendar::default());
    let sync = Arc::new(recording_sync(provider.clone()));
    spawn_reminder_create(pool.clone(), sync, &stored)
        .expect("sync is enabled")
        .await
        .unwrap();

    assert_eq!(
        provider.calls(),
        vec![
            CalendarCall::Create {
                summary: "⏰ File motion".into()
            },
            CalendarCall::Delete {
                id: MOCK_EVENT_ID.into()
            },
        ]
    );
    assert!(ReminderRepo::find_by_id(&pool, &id).await.unwrap().is_none());
}
