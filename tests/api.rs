#![cfg(feature = "server")]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use salon_books::api::{app, AppState};
use salon_books::{parse_instant, setup_database};
use serde_json::{json, Value};
use tower::ServiceExt;

// Friday 15 March 2024, mid-morning
fn fixed_now() -> NaiveDateTime {
    parse_instant("2024-03-15T10:30").unwrap()
}

fn test_app() -> Router {
    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();
    app(AppState::with_clock(conn, fixed_now))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {value}");
    value["data"].clone()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": "OK" }));
}

#[tokio::test]
async fn test_client_lifecycle() {
    let app = test_app();

    let jordan = post(&app, "/api/clients", json!({ "name": "Jordan Kim", "phone": "555-0102" })).await;
    post(&app, "/api/clients", json!({ "name": "Alex Rivera", "email": "" })).await;

    let (status, body) = send(&app, Method::GET, "/api/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alex Rivera", "Jordan Kim"]);
    assert_eq!(body["data"][0]["email"], Value::Null);

    let uri = format!("/api/clients/{}", jordan["id"]);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "phone": null, "notes": "Prefers mornings" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Jordan Kim");
    assert_eq!(body["data"]["phone"], Value::Null);
    assert_eq!(body["data"]["notes"], "Prefers mornings");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_bad_requests() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/api/clients", Some(json!({ "phone": "555" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");

    let (status, body) = send(&app, Method::PUT, "/api/clients/abc", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid id");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/finance")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/finance?from=yesterday-ish", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/finance",
        Some(json!({ "type": "REFUND", "amount": 10, "category": "Misc", "occurredOn": "2024-03-15T09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_appointment_for_unknown_client_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(json!({
            "service": "Trim",
            "start": "2024-03-15T14:00",
            "end": "2024-03-15T14:30",
            "price": 30,
            "clientId": 99
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_appointments_default_to_now() {
    let app = test_app();
    let alex = post(&app, "/api/clients", json!({ "name": "Alex Rivera" })).await;

    post(
        &app,
        "/api/appointments",
        json!({ "service": "Precision Cut", "start": "2024-03-15T09:00", "end": "2024-03-15T10:00", "price": 65 }),
    )
    .await;
    let color = post(
        &app,
        "/api/appointments",
        json!({
            "service": "Full Color",
            "start": "2024-03-15T11:00",
            "end": "2024-03-15T13:00",
            "price": "180.00",
            "clientId": alex["id"]
        }),
    )
    .await;
    assert_eq!(color["clientName"], "Alex Rivera");
    assert_eq!(color["status"], "SCHEDULED");
    assert_eq!(color["price"], 180.0);

    // The 09:00 cut already started before 10:30
    let (_, body) = send(&app, Method::GET, "/api/appointments", None).await;
    let services: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["service"].as_str().unwrap())
        .collect();
    assert_eq!(services, vec!["Full Color"]);

    let (_, body) = send(&app, Method::GET, "/api/appointments?from=2024-03-15", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let uri = format!("/api/appointments/{}", color["id"]);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "status": "COMPLETED", "clientId": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["clientId"], Value::Null);
}

#[tokio::test]
async fn test_finance_entries_newest_first() {
    let app = test_app();

    post(
        &app,
        "/api/finance",
        json!({ "type": "EXPENSE", "amount": 45, "category": "Supplies", "occurredOn": "2024-03-13T12:00" }),
    )
    .await;
    let latest = post(
        &app,
        "/api/finance",
        json!({ "type": "INCOME", "amount": "220.50", "category": "Services", "notes": "Walk-ins", "occurredOn": "2024-03-14T17:00" }),
    )
    .await;
    assert_eq!(latest["type"], "INCOME");
    assert_eq!(latest["amount"], 220.5);

    let (status, body) = send(&app, Method::GET, "/api/finance", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], latest["id"]);

    let (_, body) = send(&app, Method::GET, "/api/finance?from=2024-03-14", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_summary_and_dashboard_totals() {
    let app = test_app();

    let entries = [
        ("INCOME", 100, "2024-03-15T08:00"),
        ("EXPENSE", 30, "2024-03-15T09:15"),
        ("INCOME", 50, "2024-03-12T10:00"),
        ("EXPENSE", 20, "2024-03-04T10:00"),
        ("INCOME", 999, "2024-02-28T10:00"),
    ];
    for (kind, amount, occurred_on) in entries {
        post(
            &app,
            "/api/finance",
            json!({ "type": kind, "amount": amount, "category": "General", "occurredOn": occurred_on }),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/api/finance/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["daily"], json!({ "income": 100.0, "expense": 30.0 }));
    assert_eq!(data["weekly"], json!({ "income": 150.0, "expense": 30.0 }));
    assert_eq!(data["monthly"], json!({ "income": 150.0, "expense": 50.0 }));
    assert_eq!(data["anchors"]["startOfWeek"], "2024-03-11T00:00:00");

    post(
        &app,
        "/api/appointments",
        json!({ "service": "Blowout", "start": "2024-03-15T15:00", "end": "2024-03-15T15:45", "price": 55 }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totals"], json!({
        "daily": { "income": 100.0, "expense": 30.0 },
        "weekly": { "income": 150.0, "expense": 30.0 },
        "monthly": { "income": 150.0, "expense": 50.0 },
    }));
    assert_eq!(data["todaysAppointments"].as_array().unwrap().len(), 1);
    assert_eq!(data["upcomingAppointments"][0]["service"], "Blowout");
    assert!(data.get("financeEntries").is_none());
}

#[tokio::test]
async fn test_finance_update_returns_stored_row() {
    let app = test_app();
    let created = post(
        &app,
        "/api/finance",
        json!({ "type": "INCOME", "amount": 65, "category": "Cut", "occurredOn": "2024-03-15T08:00" }),
    )
    .await;

    let uri = format!("/api/finance/{}", created["id"]);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "occurredOn": "2024-03-15T09:00:00.123456" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, Method::GET, "/api/finance", None).await;
    assert_eq!(body["data"], listed["data"][0]);
    assert_eq!(body["data"]["occurredOn"], "2024-03-15T09:00:00.123");
}

#[tokio::test]
async fn test_five_digit_year_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/finance",
        Some(json!({ "type": "INCOME", "amount": 5, "category": "Gift card", "occurredOn": "+10000-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
