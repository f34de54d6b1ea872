//! PostgreSQL repositories built on [`database::BaseRepository`].

mod events;
mod schedules;
mod subscriptions;
mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use events::PgEventRepository;
pub use schedules::PgScheduleRepository;
pub use subscriptions::PgSubscriptionRepository;
pub use users::PgUserRepository;

use crate::error::{SchedulingError, SchedulingResult};
use crate::repository::Repositories;

impl Repositories {
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            schedules: Arc::new(PgScheduleRepository::new(db.clone())),
            events: Arc::new(PgEventRepository::new(db.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(db)),
        }
    }
}

/// Unwraps the right side of a `find_also_related` row. Foreign keys make a
/// missing side impossible short of concurrent deletion.
fn related<T>(value: Option<T>, entity: &'static str, id: i32) -> SchedulingResult<T> {
    value.ok_or_else(|| SchedulingError::Internal(format!("{} for row {} vanished", entity, id)))
}
