//! # Redis
//!
//! Document store for contact form submissions.
//!
//! ## Layout
//!
//! - `<collection>`: Redis hash, field is the record **id**, value is the record as JSON
//! - `<collection>:next_id`: integer counter, last id handed out
//!
//! ## Id assignment
//!
//! - `INCR` on the counter, one atomic command, so two requests never draw the same id
//! - `HSETNX` on the hash, an id already present is never overwritten
//! - On connect the counter is set to the current max id, so the next id is always
//!   `max + 1`: a collection filled before the counter existed carries on, an
//!   emptied or dropped collection starts again at 1
use std::{future::Future, time::Duration};

use chrono::Local;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::{info, warn};

use crate::{
    error::AppError,
    models::{Record, TIMESTAMP_FORMAT, ValidSubmission},
};

pub const MAX_INSERT_ATTEMPTS: u32 = 3;

const CONNECTION_TIMEOUT: Duration = Duration::from_millis(500);

/// Append-only collection of [`Record`]s addressed by integer id.
pub trait RecordStore: Send + Sync + 'static {
    /// Next id to try for a new record.
    fn next_id(&self) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// Stores `record` unless its id is taken, in which case nothing is
    /// written and [`AppError::DuplicateId`] is returned.
    fn insert(&self, record: &Record) -> impl Future<Output = Result<(), AppError>> + Send;

    fn get(&self, id: u64) -> impl Future<Output = Result<Option<Record>, AppError>> + Send;

    /// Highest stored id, `None` when the collection is empty or missing.
    fn max_id(&self) -> impl Future<Output = Result<Option<u64>, AppError>> + Send;
}

/// Persists `submission` under a fresh id and returns that id.
pub async fn store_submission<S: RecordStore>(
    store: &S,
    submission: &ValidSubmission,
) -> Result<u64, AppError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let mut record = Record::new(0, timestamp, submission);

    for attempt in 1..=MAX_INSERT_ATTEMPTS {
        record.id = store.next_id().await?;

        match store.insert(&record).await {
            Ok(()) => {
                info!(id = record.id, "Stored submission");
                return Ok(record.id);
            }
            Err(AppError::DuplicateId(id)) => {
                warn!(id, attempt, "Id already taken, drawing another");
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::DuplicateId(record.id))
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    key: String,
    counter_key: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, collection: &str) -> Result<Self, redis::RedisError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(CONNECTION_TIMEOUT);

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        let store = Self {
            connection,
            key: collection.to_string(),
            counter_key: format!("{collection}:next_id"),
        };
        store.sync_counter().await?;

        Ok(store)
    }

    async fn sync_counter(&self) -> Result<(), redis::RedisError> {
        let mut connection = self.connection.clone();

        let ids: Vec<u64> = connection.hkeys(&self.key).await?;
        let max_id = ids.into_iter().max().unwrap_or(0);
        let counter: Option<u64> = connection.get(&self.counter_key).await?;

        if let Some(seed) = seeded_counter(counter, max_id) {
            let _: () = connection.set(&self.counter_key, seed).await?;
            info!("Set {} from {counter:?} to {seed}", self.counter_key);
        }

        info!("Collection {} holds ids up to {max_id}", self.key);

        Ok(())
    }
}

/// Counter value to write so the next `INCR` yields `max_id + 1`, `None` when
/// the stored counter already does.
fn seeded_counter(counter: Option<u64>, max_id: u64) -> Option<u64> {
    match counter {
        Some(current) if current == max_id => None,
        None if max_id == 0 => None,
        _ => Some(max_id),
    }
}

impl RecordStore for RedisStore {
    async fn next_id(&self) -> Result<u64, AppError> {
        let mut connection = self.connection.clone();

        Ok(connection.incr(&self.counter_key, 1u64).await?)
    }

    async fn insert(&self, record: &Record) -> Result<(), AppError> {
        let mut connection = self.connection.clone();
        let document = serde_json::to_string(record)?;

        let created: bool = connection.hset_nx(&self.key, record.id, document).await?;
        if !created {
            return Err(AppError::DuplicateId(record.id));
        }

        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Record>, AppError> {
        let mut connection = self.connection.clone();

        let document: Option<String> = connection.hget(&self.key, id).await?;

        Ok(document
            .map(|document| serde_json::from_str(&document))
            .transpose()?)
    }

    async fn max_id(&self) -> Result<Option<u64>, AppError> {
        let mut connection = self.connection.clone();

        let ids: Vec<u64> = connection.hkeys(&self.key).await?;

        Ok(ids.into_iter().max())
    }
}
