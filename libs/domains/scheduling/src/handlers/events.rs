use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;

use crate::error::SchedulingResult;
use crate::models::{CreateEvent, Event, EventWithSchedule};
use crate::pagination::{Page, PageParams};
use crate::policy::Principal;
use crate::service::SchedulingServices;

pub const TAG: &str = "events";

pub(crate) fn router() -> Router<SchedulingServices> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event).delete(delete_event))
}

/// List every event (superuser only)
#[utoipa::path(
    get,
    path = "/events/",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of events with their schedules", body = Page<EventWithSchedule>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_events(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<EventWithSchedule>>> {
    let page = services.events.list_events(&principal, params).await?;
    Ok(Json(page))
}

/// Add an event to a schedule the caller manages
#[utoipa::path(
    post,
    path = "/events/",
    tag = TAG,
    request_body = CreateEvent,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn create_event(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> SchedulingResult<impl IntoResponse> {
    let event = services.events.create_event(&principal, input).await?;

    AuditEvent::new(
        Some(principal.id),
        "event.create",
        format!("event:{}", event.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .with_details(json!({
        "schedule_id": event.schedule_id,
        "day_of_week": event.day_of_week.to_string(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event with its schedule (schedule owner or superuser)
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Event ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Event found", body = EventWithSchedule),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn get_event(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
) -> SchedulingResult<Json<EventWithSchedule>> {
    let event = services.events.get_event(&principal, id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Event ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn delete_event(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services.events.delete_event(&principal, id).await?;

    AuditEvent::new(
        Some(principal.id),
        "event.delete",
        format!("event:{}", id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
