use crate::executor::Executor;

pub struct ClientRepositoryImpl {
    pub(crate) executor: Executor,
}

impl ClientRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
