use crate::error::Result;
use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::time::Duration;

/// The seam between the link service and the external key-value store.
///
/// Implementations wrap a networked, persistent, TTL-capable store.
/// Backend expiry is authoritative: once a record's TTL elapses, `get`
/// must report it absent. A transport failure is a [`StoreError`], never
/// `Ok(None)` — the code resolver's collision logic relies on absent
/// meaning "this code is free".
///
/// [`StoreError`]: crate::error::StoreError
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Retrieves the record for a short code.
    /// Returns `None` if the code does not exist or has expired.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Writes a record unconditionally (last write wins). If `ttl` is
    /// given, the backend expires the key after that duration.
    async fn put(&self, code: &ShortCode, record: &LinkRecord, ttl: Option<Duration>)
        -> Result<()>;

    /// Writes a record only if the code is currently unmapped.
    /// Returns `true` if the write happened.
    ///
    /// This is the conditional-write strengthening that closes the
    /// check-then-write window between two concurrent requests landing
    /// on the same candidate code.
    async fn put_if_absent(
        &self,
        code: &ShortCode,
        record: &LinkRecord,
        ttl: Option<Duration>,
    ) -> Result<bool>;
}
