use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter, SqlErr,
};

use inkwell_core::error::RepoError;
use inkwell_core::ports::BaseRepository;

/// Entities whose rows carry a soft-delete marker column.
pub trait SoftDelete: EntityTrait {
    fn deleted_at_column() -> Option<Self::Column> {
        None
    }
}

/// Generic PostgreSQL repository bound to one open transaction.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) txn: Arc<DatabaseTransaction>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(txn: Arc<DatabaseTransaction>) -> Self {
        Self {
            txn,
            _entity: PhantomData,
        }
    }
}

/// Map a SeaORM error onto the repository error kinds.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(sql_err) = err.sql_err() {
        match sql_err {
            SqlErr::UniqueConstraintViolation(msg) => return RepoError::Constraint(msg),
            SqlErr::ForeignKeyConstraintViolation(msg) => return RepoError::Constraint(msg),
            _ => {}
        }
    }
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait + SoftDelete,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let mut select = E::find_by_id(id);
        if let Some(column) = E::deleted_at_column() {
            select = select.filter(column.is_null());
        }

        let result = select.one(self.txn.as_ref()).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model
            .insert(self.txn.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }
}
