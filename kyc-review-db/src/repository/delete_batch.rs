use async_trait::async_trait;
use uuid::Uuid;

/// Generic repository trait for deleting multiple entities in a batch
///
/// Returns the number of items actually deleted; ids that do not exist are
/// ignored.
#[async_trait]
pub trait DeleteBatch: Send + Sync {
    /// Delete multiple items by their IDs
    ///
    /// # Arguments
    /// * `ids` - A slice of UUIDs of the entities to delete
    /// * `audit_log_id` - The audit log of the unit of work performing the change
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        audit_log_id: Uuid,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;
}
