use uuid::Uuid;

use super::state::MemoryState;
use crate::models::audit::AuditTracked;
use crate::models::client::{ClientDocumentModel, ClientModel};
use crate::models::identifiable::Identifiable;
use crate::models::kyc::{KycModel, ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel};
use crate::models::user::UserModel;

/// Binds a model to its table in [`MemoryState`].
pub trait MemoryStored: Identifiable + AuditTracked + Clone + Send + Sync + 'static {
    fn table(state: &MemoryState) -> &Vec<Self>;

    fn table_mut(state: &mut MemoryState) -> &mut Vec<Self>;

    /// Called right before the row is written on behalf of `audit_log_id`.
    fn stamp(&mut self, _audit_log_id: Uuid) -> Result<(), String> {
        Ok(())
    }

    /// Optimistic-concurrency token, if the model carries one.
    fn version(&self) -> Option<i64> {
        None
    }
}

impl MemoryStored for KycModel {
    fn table(state: &MemoryState) -> &Vec<Self> {
        &state.kyc
    }

    fn table_mut(state: &mut MemoryState) -> &mut Vec<Self> {
        &mut state.kyc
    }

    fn stamp(&mut self, audit_log_id: Uuid) -> Result<(), String> {
        self.seal(audit_log_id)
    }

    fn version(&self) -> Option<i64> {
        Some(self.hash)
    }
}

macro_rules! memory_table {
    ($model:ty, $field:ident) => {
        impl MemoryStored for $model {
            fn table(state: &MemoryState) -> &Vec<Self> {
                &state.$field
            }

            fn table_mut(state: &mut MemoryState) -> &mut Vec<Self> {
                &mut state.$field
            }
        }
    };
}

memory_table!(RelatedPersonModel, related_persons);
memory_table!(ManagementPersonModel, management_persons);
memory_table!(ShareholderModel, shareholders);
memory_table!(UboModel, ubos);
memory_table!(ClientDocumentModel, client_documents);
memory_table!(ClientModel, clients);
memory_table!(UserModel, users);
