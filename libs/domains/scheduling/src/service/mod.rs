//! Principal-aware operations over the repositories.
//!
//! Every operation that targets a single row loads it first, so a missing
//! target is reported as `NotFound` before any permission check runs.

mod events;
mod schedules;
mod subscriptions;
mod users;

pub use events::EventService;
pub use schedules::ScheduleService;
pub use subscriptions::SubscriptionService;
pub use users::UserService;

use crate::error::{SchedulingError, SchedulingResult};
use crate::repository::Repositories;

/// All four services, sharing one set of repositories.
#[derive(Clone)]
pub struct SchedulingServices {
    pub users: UserService,
    pub schedules: ScheduleService,
    pub events: EventService,
    pub subscriptions: SubscriptionService,
}

impl SchedulingServices {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            users: UserService::new(repositories.users.clone()),
            schedules: ScheduleService::new(
                repositories.schedules.clone(),
                repositories.users.clone(),
            ),
            events: EventService::new(repositories.events.clone(), repositories.schedules.clone()),
            subscriptions: SubscriptionService::new(
                repositories.subscriptions,
                repositories.schedules,
                repositories.users,
            ),
        }
    }
}

fn found<T>(value: Option<T>, entity: &'static str, id: i32) -> SchedulingResult<T> {
    value.ok_or(SchedulingError::not_found(entity, id))
}

/// A row that vanished between lookup and delete is reported as missing.
fn deleted(removed: bool, entity: &'static str, id: i32) -> SchedulingResult<()> {
    if removed {
        Ok(())
    } else {
        Err(SchedulingError::not_found(entity, id))
    }
}
