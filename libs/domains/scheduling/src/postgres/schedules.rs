use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use super::related;
use crate::entity::{schedule, subscription, user};
use crate::error::SchedulingResult;
use crate::models::{
    CreateSchedule, CreateSubscription, Schedule, ScheduleWithOwner, SubscriptionType,
};
use crate::pagination::Window;
use crate::repository::ScheduleRepository;

type Schedules = BaseRepository<schedule::Entity>;

#[derive(Clone)]
pub struct PgScheduleRepository {
    base: Schedules,
}

impl PgScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn with_owner(
    (schedule, owner): (schedule::Model, Option<user::Model>),
) -> SchedulingResult<ScheduleWithOwner> {
    let owner = related(owner, "Owner", schedule.id)?;
    Ok(ScheduleWithOwner {
        schedule: schedule.into(),
        owner: owner.into(),
    })
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn create_with_owner(&self, input: CreateSchedule) -> SchedulingResult<Schedule> {
        let txn = self.base.db().begin().await?;

        // Dropping `txn` on an error path rolls the schedule insert back
        let model = Schedules::create_in(&txn, input).await?;
        BaseRepository::<subscription::Entity>::create_in(
            &txn,
            CreateSubscription {
                subscriber_id: model.owner_id,
                schedule_id: model.id,
                subscription_type: SubscriptionType::Owner,
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(schedule_id = model.id, owner_id = model.owner_id, "Created schedule");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<ScheduleWithOwner>> {
        let row = schedule::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(self.base.db())
            .await?;

        row.map(with_owner).transpose()
    }

    async fn list(&self, window: Window) -> SchedulingResult<Vec<ScheduleWithOwner>> {
        let rows = Schedules::window(
            schedule::Entity::find().find_also_related(user::Entity),
            window.offset(),
            window.size,
        )
        .all(self.base.db())
        .await?;

        rows.into_iter().map(with_owner).collect()
    }

    async fn count(&self) -> SchedulingResult<u64> {
        Ok(self.base.get_count().await?)
    }

    async fn list_by_owner(&self, owner_id: i32, window: Window) -> SchedulingResult<Vec<Schedule>> {
        let select = schedule::Entity::find().filter(schedule::Column::OwnerId.eq(owner_id));
        let models = self.base.get_page(select, window.offset(), window.size).await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, owner_id: i32) -> SchedulingResult<u64> {
        let select = schedule::Entity::find().filter(schedule::Column::OwnerId.eq(owner_id));
        Ok(self.base.count(select).await?)
    }

    async fn delete(&self, id: i32) -> SchedulingResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(schedule_id = id, "Deleted schedule");
        }
        Ok(rows_affected > 0)
    }
}
