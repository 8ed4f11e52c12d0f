use std::marker::PhantomData;

use crate::executor::Executor;

/// Repository for one party collection; the table layout comes from
/// [`PartyTable`](super::PartyTable).
pub struct PartyRepositoryImpl<T> {
    pub(crate) executor: Executor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PartyRepositoryImpl<T> {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            _marker: PhantomData,
        }
    }
}
