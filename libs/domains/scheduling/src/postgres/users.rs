use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entity::user;
use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{NewUser, User, UserCredentials};
use crate::pagination::Window;
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct PgUserRepository {
    base: BaseRepository<user::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> SchedulingResult<User> {
        let model = self.base.create(input).await?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> SchedulingResult<Option<User>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn find_credentials(&self, email: &str) -> SchedulingResult<Option<UserCredentials>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn promote_to_superuser(&self, id: i32) -> SchedulingResult<User> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(SchedulingError::not_found("User", id))?;

        let mut active: user::ActiveModel = model.into();
        active.is_superuser = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(self.base.db()).await?;

        tracing::info!(user_id = id, "Promoted user to superuser");
        Ok(updated.into())
    }

    async fn list(&self, window: Window) -> SchedulingResult<Vec<User>> {
        let models = self.base.get_all(window.offset(), window.size).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> SchedulingResult<u64> {
        Ok(self.base.get_count().await?)
    }

    async fn delete(&self, id: i32) -> SchedulingResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(rows_affected > 0)
    }
}
