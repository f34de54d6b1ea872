use database::{HasIdentifier, Timestamped};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateSchedule, Schedule, ScheduleType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub schedule_type: ScheduleType,
    pub owner_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
    #[sea_orm(has_many = "super::subscription::Entity")]
    Subscription,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdentifier for Entity {
    const LABEL: &'static str = "Schedule";

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

impl From<Model> for Schedule {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            schedule_type: model.schedule_type,
            owner_id: model.owner_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateSchedule> for ActiveModel {
    fn from(input: CreateSchedule) -> Self {
        ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            schedule_type: Set(input.schedule_type.unwrap_or_default()),
            owner_id: Set(input.owner_id),
            ..Default::default()
        }
    }
}
