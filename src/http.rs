use crate::booking_service::{BookingError, SlotBookingService};
use crate::store::BookingStore;
use crate::types::{AppointmentStatus, BookingRequest, CaregiverFilter, Decision};
use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState<S: BookingStore> {
    pub booking_service: SlotBookingService<S>,
}

/// Caregiver identity taken from the `x-caregiver-id` header. The
/// actual authentication sits in front of this service; the header is
/// what the hosting framework forwards after login.
#[derive(Debug, Clone, Copy)]
struct CaregiverIdentity(Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookSlotRequest {
    slot_id: Uuid,
    #[serde(flatten)]
    details: BookingRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionRequest {
    appointment_id: Uuid,
    decision: Decision,
}

#[derive(Debug, Deserialize)]
struct CaregiverListQuery {
    pet_types: Option<String>,
    specializations: Option<String>,
    min_experience_years: Option<i32>,
}

impl CaregiverListQuery {
    fn into_filter(self) -> CaregiverFilter {
        let split = |value: Option<String>| -> Vec<String> {
            value
                .map(|tags| {
                    tags.split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default()
        };
        CaregiverFilter {
            pet_types: split(self.pet_types),
            specializations: split(self.specializations),
            min_experience_years: self.min_experience_years,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlotListQuery {
    from: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct AppointmentListQuery {
    status: Option<AppointmentStatus>,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Conflict(_) | BookingError::InvalidState(_) => StatusCode::CONFLICT,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub fn create_app<S: BookingStore>(booking_service: SlotBookingService<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/caregivers", get(list_caregivers))
        .route("/caregivers/:id", get(get_caregiver))
        .route("/caregivers/:id/slots", get(list_available_slots))
        .route("/book", post(book_slot));

    let caregiver = Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments/decide", post(decide_appointment))
        .route("/slots/stranded", get(list_stranded_slots))
        .route_layer(middleware::from_fn(caregiver_identity));

    Router::new()
        .merge(public)
        .merge(caregiver)
        .with_state(AppState { booking_service })
        .layer(cors)
}

async fn caregiver_identity(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let identity = request
        .headers()
        .get("x-caregiver-id")
        .and_then(|header| header.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing or invalid caregiver identity".to_string(),
        ))?;
    request.extensions_mut().insert(CaregiverIdentity(identity));
    Ok(next.run(request).await)
}

async fn list_caregivers<S: BookingStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<CaregiverListQuery>,
) -> Result<impl IntoResponse, BookingError> {
    let caregivers = state.booking_service.list_caregivers(&query.into_filter())?;
    Ok(Json(caregivers))
}

async fn get_caregiver<S: BookingStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let caregiver = state.booking_service.caregiver(id)?;
    Ok(Json(caregiver))
}

async fn list_available_slots<S: BookingStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotListQuery>,
) -> Result<impl IntoResponse, BookingError> {
    let from = query.from.unwrap_or_else(|| Local::now().date_naive());
    let slots = state.booking_service.list_available_slots(id, from)?;
    Ok(Json(slots))
}

async fn book_slot<S: BookingStore>(
    State(state): State<AppState<S>>,
    Json(booking): Json<BookSlotRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let appointment = state
        .booking_service
        .book_slot(booking.slot_id, &booking.details)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn list_appointments<S: BookingStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<CaregiverIdentity>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, BookingError> {
    let appointments = state
        .booking_service
        .list_appointments(identity.0, query.status)?;
    Ok(Json(appointments))
}

async fn decide_appointment<S: BookingStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<CaregiverIdentity>,
    Json(request): Json<DecisionRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let appointment =
        state
            .booking_service
            .decide(request.appointment_id, request.decision, identity.0)?;
    Ok(Json(appointment))
}

async fn list_stranded_slots<S: BookingStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<CaregiverIdentity>,
) -> Result<impl IntoResponse, BookingError> {
    let slots = state.booking_service.find_stranded_slots(identity.0)?;
    Ok(Json(slots))
}
