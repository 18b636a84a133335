use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;

/// DatabaseError
///
/// Anything that kept a query from producing a value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("database query failed: {0}")]
    Query(String),
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::Unavailable(e.to_string())
            }
            other => DatabaseError::Query(other.to_string()),
        }
    }
}

/// Database Trait
///
/// The relational-database collaborator. Only the raw query used by the connectivity
/// probe is implemented; catalog and messaging CRUD are not built yet.
#[async_trait]
pub trait Database: Send + Sync {
    /// Runs `sql` and returns the single integer it selects.
    async fn raw_query(&self, sql: &str) -> Result<i64, DatabaseError>;
}

/// DatabaseState
///
/// The concrete type used to share the database access across the application state.
pub type DatabaseState = Arc<dyn Database>;

/// PostgresDatabase
///
/// `Database` backed by a Postgres pool.
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool without connecting. The first query opens the connection, so the
    /// service starts while the database is down and the probe reports it.
    pub fn connect_lazy(url: &str, acquire_timeout: Duration) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn raw_query(&self, sql: &str) -> Result<i64, DatabaseError> {
        let value = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }
}

/// MockDatabase
///
/// Test double returning a fixed value, or a fixed error when `failure` is set.
#[derive(Clone, Debug, Default)]
pub struct MockDatabase {
    pub value: i64,
    pub failure: Option<String>,
}

impl MockDatabase {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    pub fn new_failing(message: &str) -> Self {
        Self {
            value: 0,
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn raw_query(&self, _sql: &str) -> Result<i64, DatabaseError> {
        match &self.failure {
            Some(message) => Err(DatabaseError::Unavailable(message.clone())),
            None => Ok(self.value),
        }
    }
}
