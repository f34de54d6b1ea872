use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select};
use std::collections::HashMap;

use super::related;
use crate::entity::{schedule, subscription, user};
use crate::error::SchedulingResult;
use crate::models::{
    CreateSubscription, SubscribedSchedule, Subscriber, Subscription, SubscriptionDetails,
    SubscriptionType,
};
use crate::pagination::Window;
use crate::repository::SubscriptionRepository;

type Subscriptions = BaseRepository<subscription::Entity>;

#[derive(Clone)]
pub struct PgSubscriptionRepository {
    base: Subscriptions,
}

impl PgSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Loads the schedules referenced by `rows` in a single query and joins
    /// them onto the subscriber rows.
    async fn with_schedules(
        &self,
        rows: Vec<(subscription::Model, Option<user::Model>)>,
    ) -> SchedulingResult<Vec<SubscriptionDetails>> {
        let ids: Vec<i32> = rows.iter().map(|(s, _)| s.schedule_id).collect();
        let schedules: HashMap<i32, schedule::Model> = schedule::Entity::find()
            .filter(schedule::Column::Id.is_in(ids))
            .all(self.base.db())
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        rows.into_iter()
            .map(|(sub, subscriber)| {
                let subscriber = related(subscriber, "Subscriber", sub.id)?;
                // Two subscriptions may share a schedule, so clone instead of remove
                let schedule =
                    related(schedules.get(&sub.schedule_id).cloned(), "Schedule", sub.id)?;
                Ok(SubscriptionDetails {
                    id: sub.id,
                    subscription_type: sub.subscription_type,
                    created_at: sub.created_at.into(),
                    updated_at: sub.updated_at.into(),
                    subscriber: subscriber.into(),
                    schedule: schedule.into(),
                })
            })
            .collect()
    }
}

fn by_schedule(schedule_id: i32) -> Select<subscription::Entity> {
    subscription::Entity::find().filter(subscription::Column::ScheduleId.eq(schedule_id))
}

fn by_subscriber(
    subscriber_id: i32,
    subscription_type: Option<SubscriptionType>,
) -> Select<subscription::Entity> {
    let mut select =
        subscription::Entity::find().filter(subscription::Column::SubscriberId.eq(subscriber_id));

    if let Some(subscription_type) = subscription_type {
        select = select.filter(subscription::Column::SubscriptionType.eq(subscription_type));
    }

    select
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, input: CreateSubscription) -> SchedulingResult<Subscription> {
        let model = self.base.create(input).await?;

        tracing::info!(
            subscription_id = model.id,
            subscriber_id = model.subscriber_id,
            schedule_id = model.schedule_id,
            subscription_type = %model.subscription_type,
            "Created subscription"
        );
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<SubscriptionDetails>> {
        let row = subscription::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(self.base.db())
            .await?;

        match row {
            Some(row) => Ok(self.with_schedules(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, window: Window) -> SchedulingResult<Vec<SubscriptionDetails>> {
        let rows = Subscriptions::window(
            subscription::Entity::find().find_also_related(user::Entity),
            window.offset(),
            window.size,
        )
        .all(self.base.db())
        .await?;

        self.with_schedules(rows).await
    }

    async fn count(&self) -> SchedulingResult<u64> {
        Ok(self.base.get_count().await?)
    }

    async fn list_by_schedule(
        &self,
        schedule_id: i32,
        window: Window,
    ) -> SchedulingResult<Vec<Subscriber>> {
        let rows = Subscriptions::window(
            by_schedule(schedule_id).find_also_related(user::Entity),
            window.offset(),
            window.size,
        )
        .all(self.base.db())
        .await?;

        rows.into_iter()
            .map(|(sub, subscriber)| {
                let subscriber = related(subscriber, "Subscriber", sub.id)?;
                Ok(Subscriber {
                    id: sub.id,
                    subscription_type: sub.subscription_type,
                    created_at: sub.created_at.into(),
                    updated_at: sub.updated_at.into(),
                    subscriber: subscriber.into(),
                })
            })
            .collect()
    }

    async fn count_by_schedule(&self, schedule_id: i32) -> SchedulingResult<u64> {
        Ok(self.base.count(by_schedule(schedule_id)).await?)
    }

    async fn list_by_subscriber(
        &self,
        subscriber_id: i32,
        subscription_type: Option<SubscriptionType>,
        window: Window,
    ) -> SchedulingResult<Vec<SubscribedSchedule>> {
        let rows = Subscriptions::window(
            by_subscriber(subscriber_id, subscription_type).find_also_related(schedule::Entity),
            window.offset(),
            window.size,
        )
        .all(self.base.db())
        .await?;

        rows.into_iter()
            .map(|(sub, schedule)| {
                let schedule = related(schedule, "Schedule", sub.id)?;
                Ok(SubscribedSchedule {
                    id: sub.id,
                    subscription_type: sub.subscription_type,
                    created_at: sub.created_at.into(),
                    updated_at: sub.updated_at.into(),
                    schedule: schedule.into(),
                })
            })
            .collect()
    }

    async fn count_by_subscriber(
        &self,
        subscriber_id: i32,
        subscription_type: Option<SubscriptionType>,
    ) -> SchedulingResult<u64> {
        Ok(self
            .base
            .count(by_subscriber(subscriber_id, subscription_type))
            .await?)
    }

    async fn delete(&self, id: i32) -> SchedulingResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(subscription_id = id, "Deleted subscription");
        }
        Ok(rows_affected > 0)
    }
}
