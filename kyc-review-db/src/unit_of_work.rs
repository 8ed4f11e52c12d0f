//! Transaction boundary shared by every mutating service call.
//!
//! A [`UnitOfWork`] hands out sessions. All repositories of one session see
//! the same transaction: writes become visible to other sessions only after
//! [`UnitOfWorkSession::commit`], and a session dropped without commit is
//! rolled back.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::kyc::{ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel};
use crate::repository::{
    AuditLinkRepository, AuditLogRepository, ClientDocumentRepository, ClientRepository, KycDocumentFileRepository,
    KycRepository, PartyRepository, UserRepository,
};

/// Every repository bound to one session.
#[derive(Clone)]
pub struct ReviewRepositories {
    pub kyc_repository: Arc<dyn KycRepository>,
    pub related_person_repository: Arc<dyn PartyRepository<RelatedPersonModel>>,
    pub management_person_repository: Arc<dyn PartyRepository<ManagementPersonModel>>,
    pub shareholder_repository: Arc<dyn PartyRepository<ShareholderModel>>,
    pub ubo_repository: Arc<dyn PartyRepository<UboModel>>,
    pub client_document_repository: Arc<dyn ClientDocumentRepository>,
    pub kyc_document_file_repository: Arc<dyn KycDocumentFileRepository>,
    pub client_repository: Arc<dyn ClientRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub audit_log_repository: Arc<dyn AuditLogRepository>,
    pub audit_link_repository: Arc<dyn AuditLinkRepository>,
}

#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    fn repositories(&self) -> &ReviewRepositories;

    /// Makes every write of this session durable.
    async fn commit(self: Box<Self>) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, Box<dyn std::error::Error + Send + Sync>>;
}
