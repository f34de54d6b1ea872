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
use crate::models::{CreateSchedule, Event, Schedule, ScheduleWithOwner, Subscriber};
use crate::pagination::{Page, PageParams};
use crate::policy::Principal;
use crate::service::SchedulingServices;

pub const TAG: &str = "schedules";

pub(crate) fn router() -> Router<SchedulingServices> {
    Router::new()
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/", get(list_schedules).post(create_schedule))
        .route("/schedules/{id}", get(get_schedule).delete(delete_schedule))
        .route("/schedules/{id}/events", get(list_schedule_events))
        .route("/schedules/{id}/subscribers", get(list_schedule_subscribers))
}

/// List every schedule (superuser only)
#[utoipa::path(
    get,
    path = "/schedules/",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of schedules with their owners", body = Page<ScheduleWithOwner>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_schedules(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<ScheduleWithOwner>>> {
    let page = services.schedules.list_schedules(&principal, params).await?;
    Ok(Json(page))
}

/// Create a schedule for any owner (superuser only)
///
/// The owner's `owner` subscription is created in the same transaction.
#[utoipa::path(
    post,
    path = "/schedules/",
    tag = TAG,
    request_body = CreateSchedule,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateSchedule>,
) -> SchedulingResult<impl IntoResponse> {
    let schedule = services
        .schedules
        .create_schedule(&principal, input)
        .await?;

    AuditEvent::new(
        Some(principal.id),
        "schedule.create",
        format!("schedule:{}", schedule.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .with_details(json!({
        "owner_id": schedule.owner_id,
        "schedule_type": schedule.schedule_type.to_string(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Get a schedule with its owner
///
/// Private schedules are visible to their owner and superusers only.
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Schedule ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Schedule found", body = ScheduleWithOwner),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn get_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
) -> SchedulingResult<Json<ScheduleWithOwner>> {
    let schedule = services.schedules.get_schedule(&principal, id).await?;
    Ok(Json(schedule))
}

/// Delete a schedule with its events and subscriptions
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Schedule ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn delete_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services.schedules.delete_schedule(&principal, id).await?;

    AuditEvent::new(
        Some(principal.id),
        "schedule.delete",
        format!("schedule:{}", id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// List the events of a schedule
#[utoipa::path(
    get,
    path = "/schedules/{id}/events",
    tag = TAG,
    params(("id" = i32, Path, description = "Schedule ID"), PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of events", body = Page<Event>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn list_schedule_events(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<Event>>> {
    let page = services
        .events
        .list_for_schedule(&principal, id, params)
        .await?;
    Ok(Json(page))
}

/// List the subscribers of a schedule (owner or superuser)
#[utoipa::path(
    get,
    path = "/schedules/{id}/subscribers",
    tag = TAG,
    params(("id" = i32, Path, description = "Schedule ID"), PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of subscribers, the owner included", body = Page<Subscriber>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn list_schedule_subscribers(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<Subscriber>>> {
    let page = services
        .subscriptions
        .list_subscribers(&principal, id, params)
        .await?;
    Ok(Json(page))
}
