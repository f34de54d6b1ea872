use database::{HasIdentifier, Timestamped};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateSubscription, Subscription, SubscriptionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subscriber_id: i32,
    pub schedule_id: i32,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubscriberId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Subscriber,
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id",
        on_delete = "Cascade"
    )]
    Schedule,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriber.def()
    }
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdentifier for Entity {
    const LABEL: &'static str = "Subscription";

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

impl From<Model> for Subscription {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            subscriber_id: model.subscriber_id,
            schedule_id: model.schedule_id,
            subscription_type: model.subscription_type,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateSubscription> for ActiveModel {
    fn from(input: CreateSubscription) -> Self {
        ActiveModel {
            subscriber_id: Set(input.subscriber_id),
            schedule_id: Set(input.schedule_id),
            subscription_type: Set(input.subscription_type),
            ..Default::default()
        }
    }
}
