use crate::executor::Executor;

pub struct UserRepositoryImpl {
    pub(crate) executor: Executor,
}

impl UserRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

pub(super) const USER_SELECT: &str = "SELECT id, agency_id, email, name, role, created_at FROM app_user";
