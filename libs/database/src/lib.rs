//! PostgreSQL connectivity and the generic entity store used by the domain crates.
//!
//! # Features
//!
//! - `postgres` (default): SeaORM connector, health checks, migrations and
//!   [`repository::BaseRepository`]
//! - `config` (default): `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "scheduler_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub mod repository;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

#[cfg(feature = "postgres")]
pub use repository::{BaseRepository, HasIdentifier, MAX_OFFSET, Timestamped};
