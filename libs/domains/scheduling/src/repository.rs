//! Storage ports, one per entity.
//!
//! List methods take an already clamped [`Window`]; counts use the same
//! filter as the matching list.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SchedulingResult;
use crate::models::{
    CreateEvent, CreateSchedule, CreateSubscription, Event, EventWithSchedule, NewUser, Schedule,
    ScheduleWithOwner, SubscribedSchedule, Subscriber, Subscription, SubscriptionDetails,
    SubscriptionType, User, UserCredentials,
};
use crate::pagination::Window;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: NewUser) -> SchedulingResult<User>;

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<User>>;

    async fn find_credentials(&self, email: &str) -> SchedulingResult<Option<UserCredentials>>;

    async fn promote_to_superuser(&self, id: i32) -> SchedulingResult<User>;

    async fn list(&self, window: Window) -> SchedulingResult<Vec<User>>;

    async fn count(&self) -> SchedulingResult<u64>;

    /// Returns `false` when no row was removed.
    async fn delete(&self, id: i32) -> SchedulingResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Inserts the schedule and its owner subscription in one transaction.
    async fn create_with_owner(&self, input: CreateSchedule) -> SchedulingResult<Schedule>;

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<ScheduleWithOwner>>;

    async fn list(&self, window: Window) -> SchedulingResult<Vec<ScheduleWithOwner>>;

    async fn count(&self) -> SchedulingResult<u64>;

    async fn list_by_owner(&self, owner_id: i32, window: Window) -> SchedulingResult<Vec<Schedule>>;

    async fn count_by_owner(&self, owner_id: i32) -> SchedulingResult<u64>;

    async fn delete(&self, id: i32) -> SchedulingResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, input: CreateEvent) -> SchedulingResult<Event>;

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<EventWithSchedule>>;

    async fn list(&self, window: Window) -> SchedulingResult<Vec<EventWithSchedule>>;

    async fn count(&self) -> SchedulingResult<u64>;

    async fn list_by_schedule(&self, schedule_id: i32, window: Window)
    -> SchedulingResult<Vec<Event>>;

    async fn count_by_schedule(&self, schedule_id: i32) -> SchedulingResult<u64>;

    async fn delete(&self, id: i32) -> SchedulingResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, input: CreateSubscription) -> SchedulingResult<Subscription>;

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<SubscriptionDetails>>;

    async fn list(&self, window: Window) -> SchedulingResult<Vec<SubscriptionDetails>>;

    async fn count(&self) -> SchedulingResult<u64>;

    async fn list_by_schedule(
        &self,
        schedule_id: i32,
        window: Window,
    ) -> SchedulingResult<Vec<Subscriber>>;

    async fn count_by_schedule(&self, schedule_id: i32) -> SchedulingResult<u64>;

    /// `subscription_type = None` matches both owner and follower links.
    async fn list_by_subscriber(
        &self,
        subscriber_id: i32,
        subscription_type: Option<SubscriptionType>,
        window: Window,
    ) -> SchedulingResult<Vec<SubscribedSchedule>>;

    async fn count_by_subscriber(
        &self,
        subscriber_id: i32,
        subscription_type: Option<SubscriptionType>,
    ) -> SchedulingResult<u64>;

    async fn delete(&self, id: i32) -> SchedulingResult<bool>;
}

/// Shared handles to every repository, cloned into the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub events: Arc<dyn EventRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}
