#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use ward_calendar::http_api::{self, AppState, UpcomingResponse, WardSummary};
use ward_calendar::{CalendarDate, Clock, Meeting, MeetingDay, Ward, WardRoster};

fn d(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

fn router_with(roster: WardRoster) -> axum::Router {
    let state = AppState::new(roster, Clock::Fixed(d(2024, 3, 1)));
    http_api::router(state)
}

fn new_router() -> axum::Router {
    router_with(WardRoster::seeded())
}

async fn delete(app: &axum::Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn send_json(app: &axum::Router, method: &str, uri: &str, payload: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = new_router();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_all_wards() {
    let app = new_router();
    let response = get(&app, "/wards").await;
    assert_eq!(response.status(), StatusCode::OK);
    let wards: Vec<Ward> = read_json(response).await;
    assert_eq!(wards.len(), 12);
    assert_eq!(wards[0].meeting_day, MeetingDay::Wednesday);
}

#[tokio::test]
async fn upcoming_meetings_use_the_fixed_clock() {
    let app = new_router();
    let response = get(&app, "/wards/ward-1/upcoming").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: UpcomingResponse = read_json(response).await;
    assert_eq!(body.ward_id, "ward-1");
    assert_eq!(body.today, d(2024, 3, 1));
    assert_eq!(body.meetings.len(), 6);
    assert_eq!(body.meetings[0].date, d(2024, 3, 13));
    assert!(body.meetings[0].is_next);
    assert_eq!(body.meetings[0].display_date, "Wednesday, March 13, 2024");
    assert_eq!(body.meetings[1].date, d(2024, 3, 27));
    assert!(!body.meetings[1].is_next);

    let response = get(&app, "/wards/ward-1/upcoming?count=2").await;
    let body: UpcomingResponse = read_json(response).await;
    assert_eq!(body.meetings.len(), 2);

    let response = get(&app, "/wards/ward-1/upcoming?count=0").await;
    let body: UpcomingResponse = read_json(response).await;
    assert!(body.meetings.is_empty());
}

#[tokio::test]
async fn oversized_count_is_rejected() {
    let app = new_router();
    let response = get(&app, "/wards/ward-1/upcoming?count=1000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn unknown_ward_is_not_found() {
    let app = new_router();
    for uri in ["/wards/ward-99", "/wards/ward-99/upcoming", "/wards/ward-99/meetings"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = read_json(response).await;
        assert_eq!(body["error"], "not_found");
    }
}

#[tokio::test]
async fn patch_changes_frequency_and_projection() {
    let app = new_router();
    let response = send_json(&app, "PATCH", "/wards/ward-1", json!({ "frequency_weeks": 1 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let ward: Ward = read_json(response).await;
    assert_eq!(ward.frequency_weeks, 1);
    assert!(ward.updated_at.is_some());

    // Weekly from 2024-01-03: nine weeks in lands on 2024-03-06.
    let response = get(&app, "/wards/ward-1/upcoming?count=1").await;
    let body: UpcomingResponse = read_json(response).await;
    assert_eq!(body.meetings[0].date, d(2024, 3, 6));
}

#[tokio::test]
async fn update_details_accepts_partial_edits() {
    let app = new_router();
    let response = send_json(
        &app,
        "POST",
        "/wards/ward-3/update_details",
        json!({ "venue": "New Pavilion", "meeting_day": "Tuesday", "start_date": "2024-01-02" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let ward: Ward = read_json(get(&app, "/wards/ward-3").await).await;
    assert_eq!(ward.venue, "New Pavilion");
    assert_eq!(ward.meeting_day, MeetingDay::Tuesday);
    assert_eq!(ward.start_date, d(2024, 1, 2));
    assert_eq!(ward.ward_name, "Ward 3 (South)");
}

#[tokio::test]
async fn invalid_update_is_a_bad_request() {
    let app = new_router();
    let response = send_json(&app, "PATCH", "/wards/ward-1", json!({ "frequency_weeks": 0 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "invalid_request");

    let response = send_json(
        &app,
        "PATCH",
        "/wards/ward-1",
        json!({ "ward_name": "Ward 2 (North)" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ward: Ward = read_json(get(&app, "/wards/ward-1").await).await;
    assert_eq!(ward.frequency_weeks, 2);
    assert_eq!(ward.ward_name, "Ward 1 (Central)");
}

#[tokio::test]
async fn summary_has_one_upcoming_meeting_per_ward() {
    let app = new_router();
    let response = get(&app, "/wards/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let summaries: Vec<WardSummary> = read_json(response).await;
    assert_eq!(summaries.len(), 12);
    assert!(summaries.iter().all(|s| s.upcoming.len() == 1 && s.schedule_error.is_none()));
    assert_eq!(summaries[0].schedule_label, "Wednesdays @ 5:00 PM");
    assert_eq!(summaries[0].upcoming[0].date, d(2024, 3, 13));
}

#[tokio::test]
async fn cancelled_recorded_meeting_is_flagged() {
    let mut roster = WardRoster::seeded();
    let mut meeting = Meeting::new(1, d(2024, 3, 13), "5:00 PM", "Akinyele Primary School Hall");
    meeting.is_cancelled = true;
    roster.record_meeting("ward-1", meeting).unwrap();
    let app = router_with(roster);

    let body: UpcomingResponse = read_json(get(&app, "/wards/ward-1/upcoming?count=2").await).await;
    assert!(body.meetings[0].cancelled);
    assert!(!body.meetings[1].cancelled);

    let meetings: Vec<Meeting> = read_json(get(&app, "/wards/ward-1/meetings").await).await;
    assert_eq!(meetings.len(), 1);
    assert!(meetings[0].is_cancelled);
}

#[tokio::test]
async fn unprojectable_schedule_degrades_gracefully() {
    let mut ward = Ward::new(
        "ward-edge",
        "Edge",
        MeetingDay::Monday,
        "9:00 AM",
        "Hall",
        d(262_142, 6, 1),
    );
    ward.frequency_weeks = 52;
    let app = router_with(WardRoster::from_wards(vec![ward]).unwrap());

    let response = get(&app, "/wards/ward-edge/upcoming?count=6").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "schedule_unavailable");

    let summaries: Vec<WardSummary> = read_json(get(&app, "/wards/summary").await).await;
    assert_eq!(summaries[0].upcoming.len(), 1);
}

#[tokio::test]
async fn ward_lifecycle_via_http_api() {
    let app = new_router();
    let ward = Ward::new(
        "ward-13",
        "Ward 13 (Lakeside)",
        MeetingDay::Friday,
        "5:00 PM",
        "Lakeside Hall",
        d(2024, 1, 5),
    );

    // Create ward
    let response = send_json(&app, "POST", "/wards", serde_json::to_value(&ward).unwrap()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Ward = read_json(response).await;
    assert_eq!(created.id, "ward-13");
    assert!(created.created_at.is_some());

    // Fetch it back, with a projection
    let response = get(&app, "/wards/ward-13/upcoming?count=1").await;
    let body: UpcomingResponse = read_json(response).await;
    assert_eq!(body.meetings[0].date, d(2024, 3, 1));

    // Same id again conflicts
    let response = send_json(&app, "POST", "/wards", serde_json::to_value(&ward).unwrap()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "conflict");

    // Delete the ward
    let response = delete(&app, "/wards/ward-13").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Ensure the ward is gone
    let response = get(&app, "/wards/ward-13").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete(&app, "/wards/ward-13").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_clashing_name_is_a_bad_request() {
    let app = new_router();
    let ward = Ward::new(
        "ward-13",
        "WARD 1 (CENTRAL)",
        MeetingDay::Friday,
        "5:00 PM",
        "Hall",
        d(2024, 1, 5),
    );
    let response = send_json(&app, "POST", "/wards", serde_json::to_value(&ward).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let wards: Vec<Ward> = read_json(get(&app, "/wards").await).await;
    assert_eq!(wards.len(), 12);
}

#[tokio::test]
async fn recording_a_cancelled_meeting_flags_the_projection() {
    let app = new_router();
    let response = send_json(
        &app,
        "POST",
        "/wards/ward-1/meetings",
        json!({ "meeting_date": "2024-03-13", "is_cancelled": true, "notes": "Public holiday" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let meeting: Meeting = read_json(response).await;
    assert_eq!(meeting.id, 1);
    assert_eq!(meeting.meeting_time, "5:00 PM");
    assert_eq!(meeting.venue, "Akinyele Primary School Hall");

    let body: UpcomingResponse = read_json(get(&app, "/wards/ward-1/upcoming?count=2").await).await;
    assert!(body.meetings[0].cancelled);
    assert!(!body.meetings[1].cancelled);

    // One meeting per date
    let response = send_json(
        &app,
        "POST",
        "/wards/ward-1/meetings",
        json!({ "meeting_date": "2024-03-13" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/wards/ward-99/meetings",
        json!({ "meeting_date": "2024-03-13" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
