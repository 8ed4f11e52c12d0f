use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::audit::MemoryAuditRepository;
use super::link::MemoryKycDocumentFileRepository;
use super::repository::{MemoryContext, MemoryRepository};
use super::state::MemoryState;
use crate::models::audit::AuditEntityType;
use crate::unit_of_work::{ReviewRepositories, UnitOfWork, UnitOfWorkSession};

/// In-memory unit of work.
///
/// Sessions run one at a time: `begin` waits for the previous session to
/// commit or drop. Each session works on a copy of the committed state;
/// commit publishes the copy, drop discards it.
#[derive(Clone, Default)]
pub struct MemoryUnitOfWork {
    committed: Arc<AsyncMutex<MemoryState>>,
    failure: Arc<Mutex<Option<AuditEntityType>>>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write of `entity_type` fail until cleared with `None`.
    pub fn inject_failure(&self, entity_type: Option<AuditEntityType>) {
        *self.failure.lock() = entity_type;
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.committed.lock().await.clone()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, Box<dyn Error + Send + Sync>> {
        let guard = self.committed.clone().lock_owned().await;
        let ctx = MemoryContext {
            state: Arc::new(Mutex::new(guard.clone())),
            failure: self.failure.clone(),
        };
        let audit = Arc::new(MemoryAuditRepository::new(ctx.clone()));
        let repositories = ReviewRepositories {
            kyc_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            related_person_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            management_person_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            shareholder_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            ubo_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            client_document_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            kyc_document_file_repository: Arc::new(MemoryKycDocumentFileRepository::new(ctx.clone())),
            client_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            user_repository: Arc::new(MemoryRepository::new(ctx.clone())),
            audit_log_repository: audit.clone(),
            audit_link_repository: audit,
        };
        Ok(Box::new(MemorySession {
            guard,
            ctx,
            repositories,
        }))
    }
}

pub struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    ctx: MemoryContext,
    repositories: ReviewRepositories,
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    fn repositories(&self) -> &ReviewRepositories {
        &self.repositories
    }

    async fn commit(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut session = *self;
        let working = session.ctx.state.lock().clone();
        *session.guard = working;
        Ok(())
    }
}
