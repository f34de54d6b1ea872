//! Scheduling Domain
//!
//! Users own schedules, schedules hold weekly events, and users follow each
//! other's public schedules through subscriptions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JWT principal, audit log
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, ownership and visibility rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage ports + PostgreSQL implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← Sea-ORM models, relations, cascades
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn example(db: sea_orm::DatabaseConnection, jwt: axum_helpers::JwtAuth) {
//! use domain_scheduling::{Repositories, SchedulingServices, handlers};
//!
//! let services = SchedulingServices::new(Repositories::postgres(db));
//! let router = handlers::router(services, jwt);
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{SchedulingError, SchedulingResult};
pub use handlers::SchedulingApiDoc;
pub use models::{
    CreateEvent, CreateSchedule, CreateSubscription, DayOfWeek, Event, EventWithSchedule,
    LoginForm, NewSchedule, RegisterUser, Schedule, ScheduleType, ScheduleWithOwner,
    SubscribedSchedule, Subscriber, Subscription, SubscriptionDetails, SubscriptionType,
    TokenResponse, User,
};
pub use pagination::{Page, PageParams};
pub use policy::Principal;
pub use postgres::{
    PgEventRepository, PgScheduleRepository, PgSubscriptionRepository, PgUserRepository,
};
pub use repository::{
    EventRepository, Repositories, ScheduleRepository, SubscriptionRepository, UserRepository,
};
pub use service::{
    EventService, ScheduleService, SchedulingServices, SubscriptionService, UserService,
};
