//! Generic entity store shared by the domain repositories.
//!
//! [`BaseRepository`] covers the operations every table supports (create,
//! lookup by id, ordered windows, counts and deletes). Entity-specific
//! queries build a [`Select`] and hand it to [`BaseRepository::get_page`] or
//! [`BaseRepository::count`] so that ordering and windowing stay uniform.

use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};

use crate::common::{DatabaseError, DatabaseResult};

/// Largest OFFSET bound into a paged query.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Entities keyed by an auto-incrementing `i32` column.
pub trait HasIdentifier: EntityTrait {
    /// Human-readable name used in not-found errors
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
}

/// Active models carrying `created_at` / `updated_at` columns.
pub trait Timestamped {
    fn stamp(&mut self, now: DateTimeWithTimeZone);
}

pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: HasIdentifier,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelBehavior + Timestamped + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Inserts a row built from `payload`, stamping both timestamps.
    ///
    /// Returns the stored row with its generated id.
    pub async fn create<P>(&self, payload: P) -> Result<E::Model, DbErr>
    where
        P: Into<E::ActiveModel> + Send,
    {
        Self::create_in(&self.db, payload).await
    }

    /// [`create`](Self::create) against an arbitrary connection, typically an
    /// open transaction.
    pub async fn create_in<C, P>(conn: &C, payload: P) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
        P: Into<E::ActiveModel> + Send,
    {
        let mut model: E::ActiveModel = payload.into();
        model.stamp(Utc::now().into());
        model.insert(conn).await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> DatabaseResult<E::Model> {
        self.find_by_id(id).await?.ok_or(DatabaseError::NotFound {
            entity: E::LABEL,
            id,
        })
    }

    /// `limit` rows starting at `offset`, in ascending id order.
    pub async fn get_all(&self, offset: u64, limit: u64) -> Result<Vec<E::Model>, DbErr> {
        self.get_page(E::find(), offset, limit).await
    }

    /// Windows an already filtered query the same way as [`get_all`](Self::get_all).
    pub async fn get_page(
        &self,
        select: Select<E>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        Self::window(select, offset, limit).all(&self.db).await
    }

    pub async fn get_count(&self) -> Result<u64, DbErr> {
        self.count(E::find()).await
    }

    pub async fn count(&self, select: Select<E>) -> Result<u64, DbErr> {
        select.count(&self.db).await
    }

    /// Returns the number of rows removed; zero when `id` does not exist.
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbErr> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Ordering and offset/limit applied by every paged query.
    ///
    /// Postgres binds OFFSET as a signed bigint, so `offset` is capped at
    /// [`MAX_OFFSET`]; anything past it is an empty page anyway.
    pub fn window<Q>(select: Q, offset: u64, limit: u64) -> Q
    where
        Q: QueryOrder + QuerySelect,
    {
        select
            .order_by_asc(E::id_column())
            .offset(offset.min(MAX_OFFSET))
            .limit(limit)
    }
}
