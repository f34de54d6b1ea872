//! Routes scoped to the authenticated user. Ownership is enforced even for
//! superusers here; the admin routes are the way around it.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;

use crate::error::SchedulingResult;
use crate::models::{NewSchedule, Schedule, SubscribedSchedule, Subscription, SubscriptionType};
use crate::pagination::{Page, PageParams};
use crate::policy::Principal;
use crate::service::SchedulingServices;

pub const TAG: &str = "me";

pub(crate) fn router() -> Router<SchedulingServices> {
    Router::new()
        .route("/me/schedules", get(list_my_schedules).post(create_my_schedule))
        .route("/me/schedules/", get(list_my_schedules).post(create_my_schedule))
        .route("/me/schedules/{id}", delete(delete_my_schedule))
        .route("/me/subscriptions/as_owner", get(list_my_owner_subscriptions))
        .route(
            "/me/subscriptions/as_follower",
            get(list_my_follower_subscriptions),
        )
        .route(
            "/me/subscriptions/add_as_follower/{schedule_id}",
            post(follow_schedule),
        )
        .route("/me/subscriptions/{id}", delete(delete_my_subscription))
}

#[utoipa::path(
    get,
    path = "/me/schedules",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of schedules the caller owns", body = Page<Schedule>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn list_my_schedules(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<Schedule>>> {
    let page = services.schedules.list_mine(&principal, params).await?;
    Ok(Json(page))
}

/// Create a schedule owned by the caller
#[utoipa::path(
    post,
    path = "/me/schedules",
    tag = TAG,
    request_body = NewSchedule,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn create_my_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<NewSchedule>,
) -> SchedulingResult<impl IntoResponse> {
    let schedule = services.schedules.create_mine(&principal, input).await?;

    AuditEvent::new(
        Some(principal.id),
        "schedule.create",
        format!("schedule:{}", schedule.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .with_details(json!({ "schedule_type": schedule.schedule_type.to_string() }))
    .log();

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    delete,
    path = "/me/schedules/{id}",
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
pub async fn delete_my_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services.schedules.delete_mine(&principal, id).await?;

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

/// Schedules the caller owns, seen through their `owner` subscriptions
#[utoipa::path(
    get,
    path = "/me/subscriptions/as_owner",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of owned schedules", body = Page<SubscribedSchedule>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn list_my_owner_subscriptions(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<SubscribedSchedule>>> {
    let page = services
        .subscriptions
        .list_mine_by_type(&principal, SubscriptionType::Owner, params)
        .await?;
    Ok(Json(page))
}

/// Schedules the caller follows
#[utoipa::path(
    get,
    path = "/me/subscriptions/as_follower",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of followed schedules", body = Page<SubscribedSchedule>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn list_my_follower_subscriptions(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<SubscribedSchedule>>> {
    let page = services
        .subscriptions
        .list_mine_by_type(&principal, SubscriptionType::Follower, params)
        .await?;
    Ok(Json(page))
}

/// Follow a public schedule owned by someone else
#[utoipa::path(
    post,
    path = "/me/subscriptions/add_as_follower/{schedule_id}",
    tag = TAG,
    params(("schedule_id" = i32, Path, description = "Schedule ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Now following the schedule", body = Subscription),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
pub async fn follow_schedule(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(schedule_id): IdPath,
) -> SchedulingResult<Json<Subscription>> {
    let subscription = services
        .subscriptions
        .follow(&principal, schedule_id)
        .await?;

    AuditEvent::new(
        Some(principal.id),
        "subscription.follow",
        format!("subscription:{}", subscription.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .with_details(json!({ "schedule_id": schedule_id }))
    .log();

    Ok(Json(subscription))
}

/// Stop following a schedule
#[utoipa::path(
    delete,
    path = "/me/subscriptions/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Subscription ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn delete_my_subscription(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services.subscriptions.delete_mine(&principal, id).await?;

    AuditEvent::new(
        Some(principal.id),
        "subscription.delete",
        format!("subscription:{}", id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
