use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_users::User;
use crate::m20250301_000001_create_schedules::Schedule;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(SubscriptionType::Enum)
                    .values([SubscriptionType::Owner, SubscriptionType::Follower])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscription::Id))
                    .col(integer(Subscription::SubscriberId))
                    .col(integer(Subscription::ScheduleId))
                    .col(
                        ColumnDef::new(Subscription::SubscriptionType)
                            .enumeration(
                                SubscriptionType::Enum,
                                [SubscriptionType::Owner, SubscriptionType::Follower],
                            )
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Subscription::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Subscription::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_subscriber_id")
                            .from(Subscription::Table, Subscription::SubscriberId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_schedule_id")
                            .from(Subscription::Table, Subscription::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One link per (user, schedule) pair
        manager
            .create_index(
                Index::create()
                    .name("uq_subscription_subscriber_schedule")
                    .table(Subscription::Table)
                    .col(Subscription::SubscriberId)
                    .col(Subscription::ScheduleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_schedule_id")
                    .table(Subscription::Table)
                    .col(Subscription::ScheduleId)
                    .to_owned(),
            )
            .await?;

        // Exactly one owner link per schedule
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX uq_subscription_schedule_owner
                    ON subscription (schedule_id)
                    WHERE subscription_type = 'owner'
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SubscriptionType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    SubscriberId,
    ScheduleId,
    SubscriptionType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubscriptionType {
    #[sea_orm(iden = "subscription_type")]
    Enum,
    #[sea_orm(iden = "owner")]
    Owner,
    #[sea_orm(iden = "follower")]
    Follower,
}
