use crate::executor::Executor;

pub struct KycDocumentFileRepositoryImpl {
    pub(crate) executor: Executor,
}

impl KycDocumentFileRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
