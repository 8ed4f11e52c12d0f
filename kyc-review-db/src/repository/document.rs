use async_trait::async_trait;
use uuid::Uuid;

use crate::models::client::ClientDocumentModel;
use crate::models::kyc::KycDocumentFileModel;
use crate::repository::{CreateBatch, FindByClientId, FindByKycId, LoadBatch};

pub trait ClientDocumentRepository:
    CreateBatch<ClientDocumentModel> + LoadBatch<ClientDocumentModel> + FindByClientId<ClientDocumentModel>
{
}

impl<R> ClientDocumentRepository for R where
    R: CreateBatch<ClientDocumentModel> + LoadBatch<ClientDocumentModel> + FindByClientId<ClientDocumentModel>
{
}

/// Link table between KYC records and client documents.
#[async_trait]
pub trait KycDocumentFileRepository: FindByKycId<KycDocumentFileModel> {
    /// Inserts the `(kyc_id, document_id)` row.
    ///
    /// # Returns
    /// * `Ok(true)` - The link was created
    /// * `Ok(false)` - The link already existed; nothing was written
    async fn link(
        &self,
        kyc_id: Uuid,
        document_id: Uuid,
        audit_log_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Removes exactly the `(kyc_id, document_id)` row; the document itself
    /// is kept.
    ///
    /// # Returns
    /// * `Ok(true)` - The link was removed
    /// * `Ok(false)` - No such link existed
    async fn unlink(
        &self,
        kyc_id: Uuid,
        document_id: Uuid,
        audit_log_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
