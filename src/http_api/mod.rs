use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CalendarDate, Clock, Meeting, Occurrence, RecurrenceError, RosterError, Ward, WardRoster,
    WardUpdate, format::format_long,
};

/// Upper bound on `?count=` for the upcoming-meetings endpoint.
pub const MAX_UPCOMING_COUNT: usize = 104;

#[derive(Debug, Clone, Copy)]
pub struct ViewCounts {
    pub summary: usize,
    pub detail: usize,
}

impl Default for ViewCounts {
    fn default() -> Self {
        Self {
            summary: 1,
            detail: 6,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    roster: Arc<RwLock<WardRoster>>,
    clock: Clock,
    counts: ViewCounts,
}

impl AppState {
    pub fn new(roster: WardRoster, clock: Clock) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
            clock,
            counts: ViewCounts::default(),
        }
    }

    pub fn with_counts(mut self, counts: ViewCounts) -> Self {
        self.counts = counts;
        self
    }

    fn roster(&self) -> Arc<RwLock<WardRoster>> {
        self.roster.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    ScheduleUnavailable(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<RosterError> for ApiError {
    fn from(value: RosterError) -> Self {
        match value {
            RosterError::NotFound(id) => ApiError::NotFound(format!("ward {id} not found")),
            RosterError::AlreadyExists(id) => {
                ApiError::Conflict(format!("ward {id} already exists"))
            }
            RosterError::Invalid(err) => ApiError::Invalid(err.to_string()),
        }
    }
}

impl From<RecurrenceError> for ApiError {
    fn from(value: RecurrenceError) -> Self {
        ApiError::ScheduleUnavailable(format!("unable to compute meetings: {value}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::ScheduleUnavailable(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "schedule_unavailable",
                message,
            ),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// A projected meeting as presented to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingMeeting {
    pub date: CalendarDate,
    pub is_next: bool,
    pub display_date: String,
    /// A recorded meeting on this date was called off.
    pub cancelled: bool,
}

impl UpcomingMeeting {
    fn from_occurrence(ward: &Ward, occurrence: Occurrence) -> Self {
        Self {
            date: occurrence.date,
            is_next: occurrence.is_next,
            display_date: format_long(occurrence.date),
            cancelled: ward
                .recorded_meeting(occurrence.date)
                .is_some_and(|m| m.is_cancelled),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardSummary {
    pub id: String,
    pub ward_name: String,
    pub schedule_label: String,
    pub venue: String,
    pub upcoming: Vec<UpcomingMeeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingResponse {
    pub ward_id: String,
    pub today: CalendarDate,
    pub meetings: Vec<UpcomingMeeting>,
}

/// Body of `POST /wards/:id/meetings`. Time and venue default to the ward's own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub meeting_date: CalendarDate,
    #[serde(default)]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
}

#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    count: Option<usize>,
}

fn upcoming_for(
    ward: &Ward,
    count: usize,
    today: CalendarDate,
) -> Result<Vec<UpcomingMeeting>, RecurrenceError> {
    Ok(ward
        .upcoming_meetings(count, today)?
        .into_iter()
        .map(|o| UpcomingMeeting::from_occurrence(ward, o))
        .collect())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/wards", get(list_wards).post(create_ward))
        .route("/wards/summary", get(ward_summaries))
        .route(
            "/wards/:id",
            get(get_ward).patch(update_ward).delete(delete_ward),
        )
        .route("/wards/:id/update_details", post(update_ward))
        .route("/wards/:id/meetings", get(list_meetings).post(record_meeting))
        .route("/wards/:id/upcoming", get(upcoming_meetings))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ward calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_wards(State(state): State<AppState>) -> Json<Vec<Ward>> {
    let roster = state.roster();
    let wards = {
        let guard = roster.read();
        guard.wards().to_vec()
    };
    Json(wards)
}

async fn ward_summaries(State(state): State<AppState>) -> Json<Vec<WardSummary>> {
    let today = state.clock.today();
    let roster = state.roster();
    let guard = roster.read();
    let summaries = guard
        .wards()
        .iter()
        .map(|ward| {
            let (upcoming, schedule_error) = match upcoming_for(ward, state.counts.summary, today) {
                Ok(upcoming) => (upcoming, None),
                Err(err) => {
                    tracing::warn!(ward_id = %ward.id, error = %err, "unable to compute meetings");
                    (Vec::new(), Some(err.to_string()))
                }
            };
            WardSummary {
                id: ward.id.clone(),
                ward_name: ward.ward_name.clone(),
                schedule_label: ward.schedule_label(),
                venue: ward.venue.clone(),
                upcoming,
                schedule_error,
            }
        })
        .collect();
    Json(summaries)
}

async fn get_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> Result<Json<Ward>, ApiError> {
    let roster = state.roster();
    let ward = {
        let guard = roster.read();
        guard.get(&ward_id).cloned()
    };
    ward.map(Json)
        .ok_or_else(|| ApiError::not_found(format!("ward {ward_id} not found")))
}

async fn create_ward(
    State(state): State<AppState>,
    Json(ward): Json<Ward>,
) -> Result<(StatusCode, Json<Ward>), ApiError> {
    let roster = state.roster();
    let created = {
        let mut guard = roster.write();
        guard.create(ward)?.clone()
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let roster = state.roster();
    let removed = roster.write().remove(&ward_id);
    removed
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::not_found(format!("ward {ward_id} not found")))
}

async fn update_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
    Json(update): Json<WardUpdate>,
) -> Result<Json<Ward>, ApiError> {
    let roster = state.roster();
    let updated = {
        let mut guard = roster.write();
        guard.update(&ward_id, update)?.clone()
    };
    Ok(Json(updated))
}

async fn list_meetings(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> Result<Json<Vec<Meeting>>, ApiError> {
    let roster = state.roster();
    let meetings = {
        let guard = roster.read();
        guard.get(&ward_id).map(|w| w.meetings.clone())
    };
    meetings
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("ward {ward_id} not found")))
}

async fn record_meeting(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
    Json(request): Json<NewMeeting>,
) -> Result<(StatusCode, Json<Meeting>), ApiError> {
    let roster = state.roster();
    let mut guard = roster.write();
    let ward = guard
        .get(&ward_id)
        .ok_or_else(|| ApiError::not_found(format!("ward {ward_id} not found")))?;
    let meeting = Meeting {
        id: guard.next_meeting_id(),
        meeting_date: request.meeting_date,
        meeting_time: request
            .meeting_time
            .unwrap_or_else(|| ward.meeting_time.clone()),
        venue: request.venue.unwrap_or_else(|| ward.venue.clone()),
        agenda: request.agenda,
        notes: request.notes,
        is_cancelled: request.is_cancelled,
    };
    guard.record_meeting(&ward_id, meeting.clone())?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

async fn upcoming_meetings(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<UpcomingResponse>, ApiError> {
    let count = query.count.unwrap_or(state.counts.detail);
    if count > MAX_UPCOMING_COUNT {
        return Err(ApiError::invalid(format!(
            "count must be at most {MAX_UPCOMING_COUNT} (got {count})"
        )));
    }
    let today = state.clock.today();
    let roster = state.roster();
    let guard = roster.read();
    let ward = guard
        .get(&ward_id)
        .ok_or_else(|| ApiError::not_found(format!("ward {ward_id} not found")))?;
    let meetings = upcoming_for(ward, count, today)?;
    Ok(Json(UpcomingResponse {
        ward_id,
        today,
        meetings,
    }))
}
