use async_trait::async_trait;
use uuid::Uuid;

/// Finds the rows belonging to one client, newest first.
#[async_trait]
pub trait FindByClientId<T>: Send + Sync {
    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
