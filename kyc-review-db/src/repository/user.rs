use async_trait::async_trait;

use crate::models::user::UserModel;
use crate::repository::{CreateBatch, DeleteBatch, FindByAgencyId, Load};

/// Looks a user up by e-mail address. Addresses are unique across agencies.
#[async_trait]
pub trait FindByEmail: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait UserRepository:
    CreateBatch<UserModel> + Load<UserModel> + DeleteBatch + FindByAgencyId<UserModel> + FindByEmail
{
}

impl<R> UserRepository for R where
    R: CreateBatch<UserModel> + Load<UserModel> + DeleteBatch + FindByAgencyId<UserModel> + FindByEmail
{
}
