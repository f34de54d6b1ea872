pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_users;
mod m20250301_000001_create_schedules;
mod m20250301_000002_create_events;
mod m20250301_000003_create_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_users::Migration),
            Box::new(m20250301_000001_create_schedules::Migration),
            Box::new(m20250301_000002_create_events::Migration),
            Box::new(m20250301_000003_create_subscriptions::Migration),
        ]
    }
}
