use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ScheduleType::Enum)
                    .values([ScheduleType::Public, ScheduleType::Private])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .if_not_exists()
                    .col(pk_auto(Schedule::Id))
                    .col(string(Schedule::Name))
                    .col(text_null(Schedule::Description))
                    .col(
                        ColumnDef::new(Schedule::ScheduleType)
                            .enumeration(
                                ScheduleType::Enum,
                                [ScheduleType::Public, ScheduleType::Private],
                            )
                            .not_null()
                            .default("private"),
                    )
                    .col(integer(Schedule::OwnerId))
                    .col(
                        timestamp_with_time_zone(Schedule::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Schedule::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_owner_id")
                            .from(Schedule::Table, Schedule::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_owner_id")
                    .table(Schedule::Table)
                    .col(Schedule::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedule::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ScheduleType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Schedule {
    Table,
    Id,
    Name,
    Description,
    ScheduleType,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScheduleType {
    #[sea_orm(iden = "schedule_type")]
    Enum,
    #[sea_orm(iden = "public")]
    Public,
    #[sea_orm(iden = "private")]
    Private,
}
