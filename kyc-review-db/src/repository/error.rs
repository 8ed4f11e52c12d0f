use std::fmt;

use uuid::Uuid;

use crate::models::audit::AuditEntityType;

/// Raised by `update_batch` when the stored hash of an entity no longer
/// matches the hash the caller loaded.
///
/// Services downcast the boxed repository error to tell this case apart
/// from infrastructure failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrentUpdateError {
    pub entity_type: AuditEntityType,
    pub id: Uuid,
}

impl fmt::Display for ConcurrentUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entity_type: &str = self.entity_type.into();
        write!(f, "Concurrent update detected for {entity_type} {}", self.id)
    }
}

impl std::error::Error for ConcurrentUpdateError {}

/// Returns true when `error` is a [`ConcurrentUpdateError`].
pub fn is_concurrent_update(error: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    error.downcast_ref::<ConcurrentUpdateError>().is_some()
}
