use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use super::{deleted, found};
use crate::error::SchedulingResult;
use crate::models::{CreateSchedule, NewSchedule, Schedule, ScheduleWithOwner};
use crate::pagination::{Page, PageParams};
use crate::policy::{self, Principal};
use crate::repository::{ScheduleRepository, UserRepository};

#[derive(Clone)]
pub struct ScheduleService {
    schedules: Arc<dyn ScheduleRepository>,
    users: Arc<dyn UserRepository>,
}

impl ScheduleService {
    pub fn new(schedules: Arc<dyn ScheduleRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { schedules, users }
    }

    async fn load(&self, id: i32) -> SchedulingResult<ScheduleWithOwner> {
        found(self.schedules.get_by_id(id).await?, "Schedule", id)
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_schedules(
        &self,
        principal: &Principal,
        params: PageParams,
    ) -> SchedulingResult<Page<ScheduleWithOwner>> {
        policy::require_superuser(principal)?;

        let window = params.window();
        let schedules = self.schedules.list(window).await?;
        let count = self.schedules.count().await?;

        Ok(window.paginate(schedules, count))
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get_schedule(
        &self,
        principal: &Principal,
        id: i32,
    ) -> SchedulingResult<ScheduleWithOwner> {
        let schedule = self.load(id).await?;
        policy::can_read_schedule(principal, &schedule.schedule)?;

        Ok(schedule)
    }

    /// Admin route: any owner may be named. A missing owner surfaces as
    /// `MissingReference`.
    #[instrument(skip(self, input), fields(principal_id = principal.id, owner_id = input.owner_id))]
    pub async fn create_schedule(
        &self,
        principal: &Principal,
        input: CreateSchedule,
    ) -> SchedulingResult<Schedule> {
        policy::require_superuser(principal)?;
        input.validate()?;

        self.schedules.create_with_owner(input).await
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_schedule(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let schedule = self.load(id).await?;
        policy::can_manage_schedule(principal, &schedule.schedule)?;

        deleted(self.schedules.delete(id).await?, "Schedule", id)
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_owned_by(
        &self,
        principal: &Principal,
        owner_id: i32,
        params: PageParams,
    ) -> SchedulingResult<Page<Schedule>> {
        found(self.users.get_by_id(owner_id).await?, "User", owner_id)?;
        policy::self_or_superuser(principal, owner_id)?;

        self.owned_page(owner_id, params).await
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_mine(
        &self,
        principal: &Principal,
        params: PageParams,
    ) -> SchedulingResult<Page<Schedule>> {
        self.owned_page(principal.id, params).await
    }

    #[instrument(skip(self, input), fields(principal_id = principal.id))]
    pub async fn create_mine(
        &self,
        principal: &Principal,
        input: NewSchedule,
    ) -> SchedulingResult<Schedule> {
        input.validate()?;

        self.schedules
            .create_with_owner(input.owned_by(principal.id))
            .await
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_mine(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let schedule = self.load(id).await?;
        policy::is_schedule_owner(principal, &schedule.schedule)?;

        deleted(self.schedules.delete(id).await?, "Schedule", id)
    }

    async fn owned_page(&self, owner_id: i32, params: PageParams) -> SchedulingResult<Page<Schedule>> {
        let window = params.window();
        let schedules = self.schedules.list_by_owner(owner_id, window).await?;
        let count = self.schedules.count_by_owner(owner_id).await?;

        Ok(window.paginate(schedules, count))
    }
}
