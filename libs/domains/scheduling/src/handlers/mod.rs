//! HTTP surface of the scheduling domain.
//!
//! Everything except `/auth/*` sits behind [`jwt_auth_middleware`]; handlers
//! get the caller as a [`Principal`](crate::policy::Principal) and leave every
//! permission decision to the services.

pub mod auth;
pub mod events;
pub mod me;
pub mod schedules;
pub mod subscriptions;
pub mod users;

use axum::{Router, middleware};
use axum_helpers::{
    JwtAuth,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use utoipa::OpenApi;

use crate::models::{
    CreateEvent, CreateSchedule, CreateSubscription, DayOfWeek, Event, EventWithSchedule,
    LoginForm, NewSchedule, RegisterUser, Schedule, ScheduleType, ScheduleWithOwner,
    SubscribedSchedule, Subscriber, Subscription, SubscriptionDetails, SubscriptionType,
    TokenResponse, User,
};
use crate::service::SchedulingServices;

pub use auth::AuthState;

/// OpenAPI documentation for the scheduling API
///
/// Protected paths reference a `bearer` security scheme that the serving app declares.
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        schedules::list_schedules,
        schedules::create_schedule,
        schedules::get_schedule,
        schedules::delete_schedule,
        schedules::list_schedule_events,
        schedules::list_schedule_subscribers,
        events::list_events,
        events::create_event,
        events::get_event,
        events::delete_event,
        subscriptions::list_subscriptions,
        subscriptions::create_subscription,
        subscriptions::get_subscription,
        subscriptions::delete_subscription,
        users::list_users,
        users::get_user,
        users::delete_user,
        users::list_user_schedules,
        users::list_user_subscriptions,
        me::list_my_schedules,
        me::create_my_schedule,
        me::delete_my_schedule,
        me::list_my_owner_subscriptions,
        me::list_my_follower_subscriptions,
        me::follow_schedule,
        me::delete_my_subscription,
    ),
    components(
        schemas(
            User, RegisterUser, LoginForm, TokenResponse,
            Schedule, ScheduleWithOwner, CreateSchedule, NewSchedule, ScheduleType,
            Event, EventWithSchedule, CreateEvent, DayOfWeek,
            Subscription, SubscriptionDetails, Subscriber, SubscribedSchedule,
            CreateSubscription, SubscriptionType
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestIdResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = auth::TAG, description = "Registration and login"),
        (name = schedules::TAG, description = "Schedule management"),
        (name = events::TAG, description = "Events inside schedules"),
        (name = subscriptions::TAG, description = "Owner and follower links"),
        (name = users::TAG, description = "User accounts"),
        (name = me::TAG, description = "Routes scoped to the authenticated user")
    )
)]
pub struct SchedulingApiDoc;

/// Build the full scheduling router: public auth routes plus the protected API.
pub fn router(services: SchedulingServices, jwt: JwtAuth) -> Router {
    let protected = Router::new()
        .merge(schedules::router())
        .merge(events::router())
        .merge(subscriptions::router())
        .merge(users::router())
        .merge(me::router())
        .with_state(services.clone())
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            jwt_auth_middleware,
        ));

    Router::new().merge(protected).merge(auth::router(AuthState {
        users: services.users,
        jwt,
    }))
}
