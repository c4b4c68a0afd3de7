use async_trait::async_trait;
use keyhole_core::error::{Result, StoreError};
use keyhole_core::{LinkRecord, MappingStore, ShortCode};
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Upper bound on any single store round-trip. The core imposes no
/// request timeout of its own, so the adapter must not suspend forever
/// on a dead backend.
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// A Redis-backed implementation of [`MappingStore`].
///
/// Records are stored as JSON strings keyed by the bare code, so the
/// adapter reads and writes stores laid down by earlier deployments
/// byte for byte. Deployments sharing a Redis with other tenants can
/// layer a namespace on via [`with_prefix`](Self::with_prefix). TTLs
/// map onto Redis key expiry (`SET ... EX`), and the conditional write
/// maps onto `SET ... NX`, so expiry and uniqueness are both enforced
/// by the backend rather than re-checked here.
#[derive(Debug, Clone)]
pub struct RedisMappingStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    op_timeout: Duration,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// Redis `EX` takes whole seconds, so fractional TTLs round up: rounding
/// down would expire records early, and `EX 0` is rejected outright.
fn ttl_seconds(ttl: Duration) -> u64 {
    (ttl.as_millis().div_ceil(1000) as u64).max(1)
}

impl RedisMappingStore {
    /// Creates a store over an existing multiplexed connection, keyed
    /// by the bare code.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: String::new(),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Creates a store with a custom key prefix (e.g. `"myapp:link:"`).
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Opens a new connection to the given Redis URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("failed to parse Redis URL", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Overrides the per-operation timeout.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    fn store_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(|e| map_redis_error(operation, e)),
            Err(_) => Err(StoreError::Timeout(format!(
                "{operation}: no reply within {:?}",
                self.op_timeout
            ))),
        }
    }

    fn serialize(record: &LinkRecord) -> Result<String> {
        serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize record: {e}")))
    }
}

#[async_trait]
impl MappingStore for RedisMappingStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let key = self.store_key(code);
        trace!(code = %code, "Fetching record from Redis");

        let mut conn = self.conn.clone();
        let value = self
            .bounded(
                "failed to fetch value from Redis",
                conn.get::<_, Option<String>>(&key),
            )
            .await
            .inspect_err(|e| warn!(code = %code, error = %e, "Redis error on get"))?;

        match value {
            Some(raw) => match serde_json::from_str::<LinkRecord>(&raw) {
                Ok(record) => {
                    debug!(code = %code, "Record found in Redis");
                    Ok(Some(record))
                }
                Err(e) => {
                    warn!(code = %code, error = %e, "Failed to deserialize stored record");
                    Err(StoreError::InvalidData(format!(
                        "invalid stored value for key '{key}': {e}"
                    )))
                }
            },
            None => {
                trace!(code = %code, "Record absent in Redis");
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        code: &ShortCode,
        record: &LinkRecord,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let key = self.store_key(code);
        let json = Self::serialize(record)?;
        trace!(code = %code, ttl = ?ttl, "Writing record to Redis");

        let mut conn = self.conn.clone();
        let result = match ttl {
            Some(ttl) => {
                self.bounded(
                    "failed to write value to Redis",
                    conn.set_ex::<_, _, ()>(&key, json, ttl_seconds(ttl)),
                )
                .await
            }
            None => {
                self.bounded(
                    "failed to write value to Redis",
                    conn.set::<_, _, ()>(&key, json),
                )
                .await
            }
        };

        result.inspect_err(|e| warn!(code = %code, error = %e, "Redis error on put"))?;
        debug!(code = %code, "Wrote record to Redis");
        Ok(())
    }

    async fn put_if_absent(
        &self,
        code: &ShortCode,
        record: &LinkRecord,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let key = self.store_key(code);
        let json = Self::serialize(record)?;
        trace!(code = %code, ttl = ?ttl, "Conditionally writing record to Redis");

        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(json).arg("NX");
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl_seconds(ttl));
        }

        let mut conn = self.conn.clone();
        // SET NX replies OK on success and nil when the key is taken.
        let reply = self
            .bounded(
                "failed to conditionally write value to Redis",
                cmd.query_async::<Option<String>>(&mut conn),
            )
            .await
            .inspect_err(|e| warn!(code = %code, error = %e, "Redis error on put_if_absent"))?;

        let written = reply.is_some();
        debug!(code = %code, written, "Conditional write to Redis finished");
        Ok(written)
    }
}
