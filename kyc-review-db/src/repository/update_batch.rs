use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple entities in a batch
///
/// For hashed entities the incoming item must carry the hash it was loaded
/// with; if the stored hash has moved on in the meantime the update fails
/// with [`ConcurrentUpdateError`](crate::repository::ConcurrentUpdateError).
///
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    /// Update multiple items
    ///
    /// # Arguments
    /// * `items` - A vector of entities to update
    /// * `audit_log_id` - The audit log of the unit of work performing the change
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of updated entities
    /// * `Err` - An error if an item is missing, was concurrently modified, or the statement failed
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
