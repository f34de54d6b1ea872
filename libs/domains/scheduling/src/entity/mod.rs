//! Sea-ORM entities for the `user`, `schedule`, `event` and `subscription` tables.

pub mod event;
pub mod schedule;
pub mod subscription;
pub mod user;
