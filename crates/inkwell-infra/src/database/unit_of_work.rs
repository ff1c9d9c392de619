//! Transaction-scoped unit of work on PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, TransactionTrait};

use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    PostRepository, TagRepository, TransactionManager, UnitOfWork, UserRepository,
};

use super::connections::PostgresDatabase;
use super::postgres_base::map_db_err;
use super::postgres_repo::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};

/// Repositories sharing one open transaction.
///
/// Dropping this without [`UnitOfWork::commit`] drops the transaction, which
/// SeaORM rolls back.
pub struct PostgresUnitOfWork {
    users: PostgresUserRepository,
    posts: PostgresPostRepository,
    tags: PostgresTagRepository,
    txn: Arc<DatabaseTransaction>,
}

impl PostgresUnitOfWork {
    fn new(txn: DatabaseTransaction) -> Self {
        let txn = Arc::new(txn);
        Self {
            users: PostgresUserRepository::new(Arc::clone(&txn)),
            posts: PostgresPostRepository::new(Arc::clone(&txn)),
            tags: PostgresTagRepository::new(Arc::clone(&txn)),
            txn,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.posts
    }

    fn tags(&self) -> &dyn TagRepository {
        &self.tags
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let Self {
            users,
            posts,
            tags,
            txn,
        } = *self;
        drop((users, posts, tags));

        let txn = Arc::into_inner(txn)
            .ok_or_else(|| RepoError::Query("transaction still shared at commit".to_string()))?;
        txn.commit().await.map_err(map_db_err)
    }
}

#[async_trait]
impl TransactionManager for PostgresDatabase {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError> {
        let txn = self.conn.begin().await.map_err(map_db_err)?;
        Ok(Box::new(PostgresUnitOfWork::new(txn)))
    }
}
