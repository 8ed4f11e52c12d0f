use async_trait::async_trait;
use uuid::Uuid;

use crate::models::scoped::KycScoped;

/// Finds every row attached to one KYC record.
#[async_trait]
pub trait FindByKycId<T: KycScoped>: Send + Sync {
    async fn find_by_kyc_id(&self, kyc_id: Uuid) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
