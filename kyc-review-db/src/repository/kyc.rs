use crate::models::kyc::KycModel;
use crate::repository::{CreateBatch, FindByAgencyId, Load, UpdateBatch};

/// Persistence of KYC records. Records are never deleted.
pub trait KycRepository: CreateBatch<KycModel> + UpdateBatch<KycModel> + Load<KycModel> + FindByAgencyId<KycModel> {}

impl<R> KycRepository for R where
    R: CreateBatch<KycModel> + UpdateBatch<KycModel> + Load<KycModel> + FindByAgencyId<KycModel>
{
}
