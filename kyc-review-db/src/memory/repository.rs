use std::error::Error;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::state::MemoryState;
use super::table::MemoryStored;
use crate::models::audit::{AuditEntityType, AuditLinkModel};
use crate::models::client::ClientDocumentModel;
use crate::models::scoped::{AgencyScoped, KycScoped};
use crate::models::user::UserModel;
use crate::repository::{
    ConcurrentUpdateError, CreateBatch, DeleteBatch, FindByAgencyId, FindByClientId, FindByEmail, FindByKycId, Load,
    LoadBatch, Page, PageRequest, UpdateBatch,
};

/// Working copy of one session plus the shared failure switch.
#[derive(Clone)]
pub(crate) struct MemoryContext {
    pub(crate) state: Arc<Mutex<MemoryState>>,
    pub(crate) failure: Arc<Mutex<Option<AuditEntityType>>>,
}

impl MemoryContext {
    /// Fails writes of `entity_type` while a failure is injected for it.
    pub(crate) fn check_writable(&self, entity_type: AuditEntityType) -> Result<(), Box<dyn Error + Send + Sync>> {
        if *self.failure.lock() == Some(entity_type) {
            let name: &str = entity_type.into();
            debug!(entity = name, "Rejecting write, failure injected");
            return Err(format!("Injected failure writing {name}").into());
        }
        Ok(())
    }
}

pub(crate) fn record_audit_link(
    state: &mut MemoryState,
    audit_log_id: Uuid,
    entity_id: Uuid,
    entity_type: AuditEntityType,
) {
    let link = AuditLinkModel {
        audit_log_id,
        entity_id,
        entity_type,
    };
    if !state.audit_links.contains(&link) {
        state.audit_links.push(link);
    }
}

/// One table of the in-memory backend viewed as a repository.
pub struct MemoryRepository<T> {
    ctx: MemoryContext,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryRepository<T> {
    pub(crate) fn new(ctx: MemoryContext) -> Self {
        Self {
            ctx,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: MemoryStored> CreateBatch<T> for MemoryRepository<T> {
    async fn create_batch(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        self.ctx.check_writable(T::ENTITY_TYPE)?;
        let mut state = self.ctx.state.lock();
        let mut saved = Vec::with_capacity(items.len());
        for mut item in items {
            let id = item.get_id();
            if T::table(&state).iter().any(|row| row.get_id() == id) {
                return Err(format!("Duplicate key {id}").into());
            }
            item.stamp(audit_log_id)?;
            T::table_mut(&mut state).push(item.clone());
            record_audit_link(&mut state, audit_log_id, id, T::ENTITY_TYPE);
            saved.push(item);
        }
        Ok(saved)
    }
}

#[async_trait]
impl<T: MemoryStored> UpdateBatch<T> for MemoryRepository<T> {
    async fn update_batch(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        self.ctx.check_writable(T::ENTITY_TYPE)?;
        let mut state = self.ctx.state.lock();
        let mut saved = Vec::with_capacity(items.len());
        for mut item in items {
            let id = item.get_id();
            let position = T::table(&state)
                .iter()
                .position(|row| row.get_id() == id)
                .ok_or_else(|| format!("Entity {id} not found for update"))?;
            if T::table(&state)[position].version() != item.version() {
                return Err(Box::new(ConcurrentUpdateError {
                    entity_type: T::ENTITY_TYPE,
                    id,
                }));
            }
            item.stamp(audit_log_id)?;
            T::table_mut(&mut state)[position] = item.clone();
            record_audit_link(&mut state, audit_log_id, id, T::ENTITY_TYPE);
            saved.push(item);
        }
        Ok(saved)
    }
}

#[async_trait]
impl<T: MemoryStored> DeleteBatch for MemoryRepository<T> {
    async fn delete_batch(&self, ids: &[Uuid], audit_log_id: Uuid) -> Result<usize, Box<dyn Error + Send + Sync>> {
        self.ctx.check_writable(T::ENTITY_TYPE)?;
        let mut state = self.ctx.state.lock();
        let mut deleted = 0;
        for id in ids {
            let table = T::table_mut(&mut state);
            let before = table.len();
            table.retain(|row| row.get_id() != *id);
            if table.len() < before {
                deleted += 1;
                record_audit_link(&mut state, audit_log_id, *id, T::ENTITY_TYPE);
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl<T: MemoryStored> Load<T> for MemoryRepository<T> {
    async fn load(&self, id: Uuid) -> Result<Option<T>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(T::table(&state).iter().find(|row| row.get_id() == id).cloned())
    }
}

#[async_trait]
impl<T: MemoryStored> LoadBatch<T> for MemoryRepository<T> {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        let table = T::table(&state);
        Ok(ids
            .iter()
            .map(|id| table.iter().find(|row| row.get_id() == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl<T: MemoryStored + KycScoped> FindByKycId<T> for MemoryRepository<T> {
    async fn find_by_kyc_id(&self, kyc_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(T::table(&state)
            .iter()
            .filter(|row| row.kyc_id() == kyc_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<T: MemoryStored + AgencyScoped> FindByAgencyId<T> for MemoryRepository<T> {
    async fn find_by_agency_id(
        &self,
        agency_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        let mut rows: Vec<T> = T::table(&state)
            .iter()
            .filter(|row| row.agency_id() == agency_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| a.get_id().cmp(&b.get_id())));
        Ok(page.apply(&rows))
    }
}

#[async_trait]
impl FindByClientId<ClientDocumentModel> for MemoryRepository<ClientDocumentModel> {
    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<ClientDocumentModel>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        let mut rows: Vec<ClientDocumentModel> = state
            .client_documents
            .iter()
            .filter(|document| document.client_id == client_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl FindByEmail for MemoryRepository<UserModel> {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(state
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
