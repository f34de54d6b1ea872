use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_schedules::Schedule;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DAYS: [DayOfWeek; 7] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
    DayOfWeek::Sunday,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(DayOfWeek::Enum)
                    .values(DAYS)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(pk_auto(Event::Id))
                    .col(string(Event::Name))
                    .col(text_null(Event::Description))
                    .col(
                        ColumnDef::new(Event::DayOfWeek)
                            .enumeration(DayOfWeek::Enum, DAYS)
                            .not_null(),
                    )
                    .col(time(Event::StartTime))
                    .col(time(Event::EndTime))
                    .col(integer(Event::ScheduleId))
                    .col(
                        timestamp_with_time_zone(Event::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Event::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_schedule_id")
                            .from(Event::Table, Event::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_schedule_id")
                    .table(Event::Table)
                    .col(Event::ScheduleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DayOfWeek::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    Name,
    Description,
    DayOfWeek,
    StartTime,
    EndTime,
    ScheduleId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum DayOfWeek {
    #[sea_orm(iden = "day_of_week")]
    Enum,
    #[sea_orm(iden = "monday")]
    Monday,
    #[sea_orm(iden = "tuesday")]
    Tuesday,
    #[sea_orm(iden = "wednesday")]
    Wednesday,
    #[sea_orm(iden = "thursday")]
    Thursday,
    #[sea_orm(iden = "friday")]
    Friday,
    #[sea_orm(iden = "saturday")]
    Saturday,
    #[sea_orm(iden = "sunday")]
    Sunday,
}
