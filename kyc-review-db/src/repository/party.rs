use crate::models::kyc::PartyModel;
use crate::repository::{CreateBatch, DeleteBatch, FindByKycId, UpdateBatch};

/// Persistence of one party collection (related persons, management,
/// shareholders or UBOs).
pub trait PartyRepository<T: PartyModel>: CreateBatch<T> + UpdateBatch<T> + DeleteBatch + FindByKycId<T> {}

impl<T, R> PartyRepository<T> for R
where
    T: PartyModel,
    R: CreateBatch<T> + UpdateBatch<T> + DeleteBatch + FindByKycId<T>,
{
}
