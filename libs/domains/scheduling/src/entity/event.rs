use database::{HasIdentifier, Timestamped};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateEvent, DayOfWeek, Event};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub day_of_week: DayOfWeek,
    pub start_time: Time,
    pub end_time: Time,
    pub schedule_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id",
        on_delete = "Cascade"
    )]
    Schedule,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdentifier for Entity {
    const LABEL: &'static str = "Event";

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

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            day_of_week: model.day_of_week,
            start_time: model.start_time,
            end_time: model.end_time,
            schedule_id: model.schedule_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateEvent> for ActiveModel {
    fn from(input: CreateEvent) -> Self {
        ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            day_of_week: Set(input.day_of_week),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            schedule_id: Set(input.schedule_id),
            ..Default::default()
        }
    }
}
