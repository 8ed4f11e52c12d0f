use std::sync::Arc;

use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

/// Shared handle on the transaction of one unit of work.
///
/// Every repository of a session holds a clone; statements lock the mutex,
/// run against the transaction and release it. Once committed the slot is
/// empty and further statements fail with "Transaction has been consumed".
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(transaction) => transaction.commit().await,
            None => Err(sqlx::Error::Configuration("Transaction has been consumed".into())),
        }
    }

    /// Rolls back explicitly. Dropping the last executor without commit has
    /// the same effect.
    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(transaction) => transaction.rollback().await,
            None => Ok(()),
        }
    }
}
