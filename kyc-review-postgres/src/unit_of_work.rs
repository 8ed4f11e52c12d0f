use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use kyc_review_db::unit_of_work::{ReviewRepositories, UnitOfWork, UnitOfWorkSession};
use sqlx::PgPool;

use crate::executor::Executor;
use crate::repository::factory::build_all_repos;

/// Unit of work backed by one PostgreSQL transaction per session.
pub struct PostgresUnitOfWork {
    pool: Arc<PgPool>,
}

impl PostgresUnitOfWork {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    /// Starts a session with the concrete executor exposed.
    pub async fn begin_session(&self) -> Result<PostgresSession, sqlx::Error> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);
        let repositories = build_all_repos(&executor);
        Ok(PostgresSession {
            executor,
            repositories,
        })
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, Box<dyn Error + Send + Sync>> {
        Ok(Box::new(self.begin_session().await?))
    }
}

pub struct PostgresSession {
    executor: Executor,
    repositories: ReviewRepositories,
}

impl PostgresSession {
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    fn repositories(&self) -> &ReviewRepositories {
        &self.repositories
    }

    async fn commit(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.executor.commit().await?;
        Ok(())
    }
}
