use std::sync::Arc;

use kyc_review_db::models::kyc::{ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel};
use kyc_review_db::unit_of_work::ReviewRepositories;

use super::audit::{AuditLinkRepositoryImpl, AuditLogRepositoryImpl};
use super::client::{ClientDocumentRepositoryImpl, ClientRepositoryImpl};
use super::kyc::{KycDocumentFileRepositoryImpl, KycRepositoryImpl, PartyRepositoryImpl};
use super::user::UserRepositoryImpl;
use crate::executor::Executor;

/// Builds every repository on top of one shared executor, so they all run
/// inside the same transaction.
pub fn build_all_repos(executor: &Executor) -> ReviewRepositories {
    ReviewRepositories {
        kyc_repository: Arc::new(KycRepositoryImpl::new(executor.clone())),
        related_person_repository: Arc::new(PartyRepositoryImpl::<RelatedPersonModel>::new(executor.clone())),
        management_person_repository: Arc::new(PartyRepositoryImpl::<ManagementPersonModel>::new(executor.clone())),
        shareholder_repository: Arc::new(PartyRepositoryImpl::<ShareholderModel>::new(executor.clone())),
        ubo_repository: Arc::new(PartyRepositoryImpl::<UboModel>::new(executor.clone())),
        client_document_repository: Arc::new(ClientDocumentRepositoryImpl::new(executor.clone())),
        kyc_document_file_repository: Arc::new(KycDocumentFileRepositoryImpl::new(executor.clone())),
        client_repository: Arc::new(ClientRepositoryImpl::new(executor.clone())),
        user_repository: Arc::new(UserRepositoryImpl::new(executor.clone())),
        audit_log_repository: Arc::new(AuditLogRepositoryImpl::new(executor.clone())),
        audit_link_repository: Arc::new(AuditLinkRepositoryImpl::new(executor.clone())),
    }
}
