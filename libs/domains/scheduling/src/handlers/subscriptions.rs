use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, QueryParams,
    errors::responses::{
        BadRequestIdResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;

use crate::error::SchedulingResult;
use crate::models::{CreateSubscription, Subscription, SubscriptionDetails};
use crate::pagination::{Page, PageParams};
use crate::policy::Principal;
use crate::service::SchedulingServices;

pub const TAG: &str = "subscriptions";

pub(crate) fn router() -> Router<SchedulingServices> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/subscriptions/",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/subscriptions/{id}",
            get(get_subscription).delete(delete_subscription),
        )
}

/// List every subscription (superuser only)
#[utoipa::path(
    get,
    path = "/subscriptions/",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of subscriptions", body = Page<SubscriptionDetails>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_subscriptions(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<SubscriptionDetails>>> {
    let page = services
        .subscriptions
        .list_subscriptions(&principal, params)
        .await?;
    Ok(Json(page))
}

/// Link any user to any schedule (superuser only)
#[utoipa::path(
    post,
    path = "/subscriptions/",
    tag = TAG,
    request_body = CreateSubscription,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Subscription created", body = Subscription),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
pub async fn create_subscription(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    Json(input): Json<CreateSubscription>,
) -> SchedulingResult<impl IntoResponse> {
    let subscription = services
        .subscriptions
        .create_subscription(&principal, input)
        .await?;

    AuditEvent::new(
        Some(principal.id),
        "subscription.create",
        format!("subscription:{}", subscription.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .with_details(json!({
        "subscriber_id": subscription.subscriber_id,
        "schedule_id": subscription.schedule_id,
        "subscription_type": subscription.subscription_type.to_string(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Get a subscription (its subscriber or a superuser)
#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Subscription ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionDetails),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn get_subscription(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
) -> SchedulingResult<Json<SubscriptionDetails>> {
    let subscription = services
        .subscriptions
        .get_subscription(&principal, id)
        .await?;
    Ok(Json(subscription))
}

/// Remove a follower link
///
/// Owner links cannot be removed; they go away with the schedule.
#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
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
pub async fn delete_subscription(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services
        .subscriptions
        .delete_subscription(&principal, id)
        .await?;

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
