use axum::Router;
use axum_helpers::JwtAuth;
use domain_scheduling::{Repositories, SchedulingServices, handlers};

pub mod health;

/// Creates the scheduling routes with their state already applied.
///
/// Services share the one connection pool held in `AppState`.
pub fn routes(state: &crate::state::AppState, services: SchedulingServices) -> Router {
    handlers::router(services, JwtAuth::new(&state.config.jwt))
}

/// Builds the services over PostgreSQL repositories.
pub fn services(state: &crate::state::AppState) -> SchedulingServices {
    SchedulingServices::new(Repositories::postgres(state.db.clone()))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
