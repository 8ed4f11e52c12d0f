use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for creating multiple entities in a batch
///
/// All creates run inside the unit of work the repository belongs to, and
/// every created entity is linked to `audit_log_id` in the audit trail.
/// Returns the saved items with generated fields (hash, audit reference)
/// populated.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    /// Save multiple items
    ///
    /// # Arguments
    /// * `items` - A vector of entities to create
    /// * `audit_log_id` - The audit log of the unit of work performing the change
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of created entities with generated fields populated
    /// * `Err` - An error if the statement could not be executed
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
