use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::related;
use crate::entity::{event, schedule};
use crate::error::SchedulingResult;
use crate::models::{CreateEvent, Event, EventWithSchedule};
use crate::pagination::Window;
use crate::repository::EventRepository;

type Events = BaseRepository<event::Entity>;

#[derive(Clone)]
pub struct PgEventRepository {
    base: Events,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn with_schedule(
    (event, schedule): (event::Model, Option<schedule::Model>),
) -> SchedulingResult<EventWithSchedule> {
    let schedule = related(schedule, "Schedule", event.id)?;
    Ok(EventWithSchedule {
        event: event.into(),
        schedule: schedule.into(),
    })
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, input: CreateEvent) -> SchedulingResult<Event> {
        let model = self.base.create(input).await?;

        tracing::info!(event_id = model.id, schedule_id = model.schedule_id, "Created event");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<EventWithSchedule>> {
        let row = event::Entity::find_by_id(id)
            .find_also_related(schedule::Entity)
            .one(self.base.db())
            .await?;

        row.map(with_schedule).transpose()
    }

    async fn list(&self, window: Window) -> SchedulingResult<Vec<EventWithSchedule>> {
        let rows = Events::window(
            event::Entity::find().find_also_related(schedule::Entity),
            window.offset(),
            window.size,
        )
        .all(self.base.db())
        .await?;

        rows.into_iter().map(with_schedule).collect()
    }

    async fn count(&self) -> SchedulingResult<u64> {
        Ok(self.base.get_count().await?)
    }

    async fn list_by_schedule(
        &self,
        schedule_id: i32,
        window: Window,
    ) -> SchedulingResult<Vec<Event>> {
        let select = event::Entity::find().filter(event::Column::ScheduleId.eq(schedule_id));
        let models = self.base.get_page(select, window.offset(), window.size).await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_by_schedule(&self, schedule_id: i32) -> SchedulingResult<u64> {
        let select = event::Entity::find().filter(event::Column::ScheduleId.eq(schedule_id));
        Ok(self.base.count(select).await?)
    }

    async fn delete(&self, id: i32) -> SchedulingResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(event_id = id, "Deleted event");
        }
        Ok(rows_affected > 0)
    }
}
