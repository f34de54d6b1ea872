use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use super::{deleted, found};
use crate::error::SchedulingResult;
use crate::models::{CreateEvent, Event, EventWithSchedule};
use crate::pagination::{Page, PageParams};
use crate::policy::{self, Principal};
use crate::repository::{EventRepository, ScheduleRepository};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    schedules: Arc<dyn ScheduleRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, schedules: Arc<dyn ScheduleRepository>) -> Self {
        Self { events, schedules }
    }

    async fn load(&self, id: i32) -> SchedulingResult<EventWithSchedule> {
        found(self.events.get_by_id(id).await?, "Event", id)
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_events(
        &self,
        principal: &Principal,
        params: PageParams,
    ) -> SchedulingResult<Page<EventWithSchedule>> {
        policy::require_superuser(principal)?;

        let window = params.window();
        let events = self.events.list(window).await?;
        let count = self.events.count().await?;

        Ok(window.paginate(events, count))
    }

    /// Events are visible to the schedule owner and superusers only, even on
    /// public schedules.
    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get_event(
        &self,
        principal: &Principal,
        id: i32,
    ) -> SchedulingResult<EventWithSchedule> {
        let event = self.load(id).await?;
        policy::can_manage_schedule(principal, &event.schedule)?;

        Ok(event)
    }

    #[instrument(skip(self, input), fields(principal_id = principal.id, schedule_id = input.schedule_id))]
    pub async fn create_event(
        &self,
        principal: &Principal,
        input: CreateEvent,
    ) -> SchedulingResult<Event> {
        input.validate()?;

        let schedule = found(
            self.schedules.get_by_id(input.schedule_id).await?,
            "Schedule",
            input.schedule_id,
        )?;
        policy::can_manage_schedule(principal, &schedule.schedule)?;

        self.events.create(input).await
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_event(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let event = self.load(id).await?;
        policy::can_manage_schedule(principal, &event.schedule)?;

        deleted(self.events.delete(id).await?, "Event", id)
    }

    /// Same visibility as reading the schedule itself.
    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_for_schedule(
        &self,
        principal: &Principal,
        schedule_id: i32,
        params: PageParams,
    ) -> SchedulingResult<Page<Event>> {
        let schedule = found(
            self.schedules.get_by_id(schedule_id).await?,
            "Schedule",
            schedule_id,
        )?;
        policy::can_read_schedule(principal, &schedule.schedule)?;

        let window = params.window();
        let events = self.events.list_by_schedule(schedule_id, window).await?;
        let count = self.events.count_by_schedule(schedule_id).await?;

        Ok(window.paginate(events, count))
    }
}
