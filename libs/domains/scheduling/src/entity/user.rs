use database::{HasIdentifier, Timestamped};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{NewUser, User, UserCredentials};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule::Entity")]
    Schedule,
    #[sea_orm(has_many = "super::subscription::Entity")]
    Subscription,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdentifier for Entity {
    const LABEL: &'static str = "User";

    fn id_column() -> Self::Column {
        Column::Id
    }
}

impl Timestamped for ActiveModel {
    fn stamp(&mut self, now: DateTimeWithTimeZone) {
        self.created_at = Set(now);
        self.updated_at = Set(now);
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
            is_verified: model.is_verified,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Model> for UserCredentials {
    fn from(model: Model) -> Self {
        let hashed_password = model.hashed_password.clone();
        Self {
            user: model.into(),
            hashed_password,
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        ActiveModel {
            email: Set(input.email),
            hashed_password: Set(input.hashed_password),
            is_active: Set(input.is_active),
            is_superuser: Set(input.is_superuser),
            is_verified: Set(input.is_verified),
            ..Default::default()
        }
    }
}
