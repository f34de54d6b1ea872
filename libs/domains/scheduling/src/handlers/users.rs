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
        BadRequestIdResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};

use crate::error::SchedulingResult;
use crate::models::{Schedule, SubscribedSchedule, User};
use crate::pagination::{Page, PageParams};
use crate::policy::Principal;
use crate::service::SchedulingServices;

pub const TAG: &str = "users";

pub(crate) fn router() -> Router<SchedulingServices> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/", get(list_users))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/{id}/schedules", get(list_user_schedules))
        .route("/users/{id}/subscriptions", get(list_user_subscriptions))
}

/// List every user (superuser only)
#[utoipa::path(
    get,
    path = "/users/",
    tag = TAG,
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of users", body = Page<User>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_users(
    State(services): State<SchedulingServices>,
    principal: Principal,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<User>>> {
    let page = services.users.list_users(&principal, params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "User ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn get_user(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
) -> SchedulingResult<Json<User>> {
    let user = services.users.get_user(&principal, id).await?;
    Ok(Json(user))
}

/// Delete an account together with its schedules and subscriptions
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "User ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn delete_user(
    State(services): State<SchedulingServices>,
    principal: Principal,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> SchedulingResult<impl IntoResponse> {
    services.users.delete_user(&principal, id).await?;

    AuditEvent::new(
        Some(principal.id),
        "user.delete",
        format!("user:{}", id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Schedules owned by a user
#[utoipa::path(
    get,
    path = "/users/{id}/schedules",
    tag = TAG,
    params(("id" = i32, Path, description = "User ID"), PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of owned schedules", body = Page<Schedule>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn list_user_schedules(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<Schedule>>> {
    let page = services
        .schedules
        .list_owned_by(&principal, id, params)
        .await?;
    Ok(Json(page))
}

/// Every schedule a user is linked to, owned or followed
#[utoipa::path(
    get,
    path = "/users/{id}/subscriptions",
    tag = TAG,
    params(("id" = i32, Path, description = "User ID"), PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of subscribed schedules", body = Page<SubscribedSchedule>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
pub async fn list_user_subscriptions(
    State(services): State<SchedulingServices>,
    principal: Principal,
    IdPath(id): IdPath,
    QueryParams(params): QueryParams<PageParams>,
) -> SchedulingResult<Json<Page<SubscribedSchedule>>> {
    let page = services
        .subscriptions
        .list_for_subscriber(&principal, id, params)
        .await?;
    Ok(Json(page))
}
