use async_trait::async_trait;
use uuid::Uuid;

use crate::models::scoped::AgencyScoped;
use crate::repository::pagination::{Page, PageRequest};

/// Lists the entities owned by one agency, newest first.
///
/// # Example
/// ```ignore
/// use kyc_review_db::repository::pagination::PageRequest;
///
/// let page = repo.find_by_agency_id(user.agency_id, PageRequest::for_page(20, 1)).await?;
/// println!("Page {} of {}", page.page_number(), page.total_pages());
/// ```
#[async_trait]
pub trait FindByAgencyId<T: AgencyScoped>: Send + Sync {
    async fn find_by_agency_id(
        &self,
        agency_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
