use std::{error::Error, fmt::Debug, time::{Duration, Instant}};

use diesel::{result::DatabaseErrorKind, Connection, RunQueryDsl};
use thiserror::Error;

use crate::{configuration::DatabaseSettings, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, get_connection_pool, DbConnection, DbPool}};

mod customers;
mod orders;
mod transactions;
mod users;
mod widgets;

// Errors from any store call
#[derive(Error)]
pub enum StoreError{
    #[error("Failed to get connection from pool")]
    DbPoolError(#[from] r2d2::Error),
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    QueryError(#[from] diesel::result::Error),
    #[error("Database call did not complete within {0:?}")]
    Timeout(Duration)
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::QueryError(diesel::result::Error::NotFound))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::QueryError(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Typed access to the checkout tables. Every call runs in its own database
// transaction and fails once `timeout` has elapsed.
#[derive(Clone)]
pub struct Store{
    pool: DbPool,
    timeout: Duration
}

impl Store {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self{ pool, timeout }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        Self::new(get_connection_pool(settings), settings.timeout())
    }

    // The deadline covers the pool checkout and every statement. Work that
    // overruns it is rolled back, so a Timeout never leaves a committed row.
    async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut DbConnection) -> Result<T, diesel::result::Error> + Send + 'static,
        T: Send + 'static
    {
        let pool = self.pool.clone();
        let limit = self.timeout;
        let deadline = Instant::now() + limit;

        let task = spawn_blocking_with_tracing(move || -> Result<T, StoreError> {
            let mut conn = pool.get_timeout(limit)?;

            conn.transaction::<T, StoreError, _>(|conn| {
                let remaining = time_left(deadline).ok_or(StoreError::Timeout(limit))?;
                diesel::sql_query(format!("SET LOCAL statement_timeout = {}", remaining.as_millis().max(1)))
                    .execute(conn)?;

                let res = operation(conn);

                if time_left(deadline).is_none() {
                    return Err(StoreError::Timeout(limit));
                }
                Ok(res?)
            })
        });

        let outcome = task.await?;

        if let Err(e) = &outcome {
            tracing::error!("{:?}", e);
        }

        outcome
    }
}

fn time_left(deadline: Instant) -> Option<Duration> {
    deadline.checked_duration_since(Instant::now())
        .filter(|remaining| !remaining.is_zero())
}
