use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use keyhole_core::error::{Result, StoreError};
use keyhole_core::{LinkRecord, MappingStore, ShortCode};
use std::time::Duration;

/// In-memory storage entry for a link mapping.
#[derive(Debug, Clone)]
struct Entry {
    record: LinkRecord,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expire_at
            .is_some_and(|expire_at| Timestamp::now() >= expire_at)
    }
}

/// In-memory implementation of [`MappingStore`] backed by DashMap.
///
/// Expiry is enforced lazily: expired entries answer as absent and are
/// removed on the next read that touches them. DashMap's sharded locks
/// let concurrent reads and writes on different buckets proceed without
/// blocking each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    entries: DashMap<String, Entry>,
}

impl InMemoryMappingStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

fn deadline(ttl: Option<Duration>) -> Result<Option<Timestamp>> {
    ttl.map(|ttl| {
        let ttl = SignedDuration::try_from(ttl)
            .map_err(|e| StoreError::Operation(format!("ttl out of range: {e}")))?;
        // Checked: a large-but-valid TTL can push the deadline past the
        // representable timestamp range, and that must surface as a
        // typed error rather than a panic.
        Timestamp::now()
            .checked_add(ttl)
            .map_err(|e| StoreError::Operation(format!("ttl out of range: {e}")))
    })
    .transpose()
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let key = code.as_str();

        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            // Only remove what was seen: between dropping the guard and
            // removing, a concurrent writer may have replaced the
            // expired entry with a live one.
            self.entries.remove_if(key, |_, e| e.is_expired());
            return Ok(None);
        }

        Ok(Some(entry.record.clone()))
    }

    async fn put(
        &self,
        code: &ShortCode,
        record: &LinkRecord,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let entry = Entry {
            record: record.clone(),
            expire_at: deadline(ttl)?,
        };
        self.entries.insert(code.as_str().to_owned(), entry);
        Ok(())
    }

    async fn put_if_absent(
        &self,
        code: &ShortCode,
        record: &LinkRecord,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let entry = Entry {
            record: record.clone(),
            expire_at: deadline(ttl)?,
        };

        match self.entries.entry(code.as_str().to_owned()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(entry);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(code_str: &str, url: &str) -> LinkRecord {
        LinkRecord {
            code: code(code_str),
            url: url.to_string(),
            short_link: format!("https://sho.rt/s/{code_str}"),
        }
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryMappingStore::new();

        store
            .put(&code("abc123"), &record("abc123", "https://example.com"), None)
            .await
            .unwrap();

        let got = store.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(got.url, "https://example.com");
        assert_eq!(got.short_link, "https://sho.rt/s/abc123");
    }

    #[tokio::test]
    async fn get_absent() {
        let store = InMemoryMappingStore::new();
        assert!(store.get(&code("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_last_write_wins() {
        let store = InMemoryMappingStore::new();

        store
            .put(&code("abc"), &record("abc", "https://one.example"), None)
            .await
            .unwrap();
        store
            .put(&code("abc"), &record("abc", "https://two.example"), None)
            .await
            .unwrap();

        let got = store.get(&code("abc")).await.unwrap().unwrap();
        assert_eq!(got.url, "https://two.example");
    }

    #[tokio::test]
    async fn expired_entry_answers_absent() {
        let store = InMemoryMappingStore::new();

        store
            .put(
                &code("abc"),
                &record("abc", "https://example.com"),
                Some(Duration::from_millis(20)),
            )
            .await
            .unwrap();

        assert!(store.get(&code("abc")).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get(&code("abc")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_if_absent_wins_only_once() {
        let store = InMemoryMappingStore::new();

        let first = store
            .put_if_absent(&code("abc"), &record("abc", "https://one.example"), None)
            .await
            .unwrap();
        let second = store
            .put_if_absent(&code("abc"), &record("abc", "https://two.example"), None)
            .await
            .unwrap();

        assert!(first);
        assert!(!second);

        let got = store.get(&code("abc")).await.unwrap().unwrap();
        assert_eq!(got.url, "https://one.example");
    }

    #[tokio::test]
    async fn put_if_absent_reclaims_expired_entry() {
        let store = InMemoryMappingStore::new();

        store
            .put(
                &code("abc"),
                &record("abc", "https://old.example"),
                Some(Duration::from_millis(10)),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let written = store
            .put_if_absent(&code("abc"), &record("abc", "https://new.example"), None)
            .await
            .unwrap();
        assert!(written);

        let got = store.get(&code("abc")).await.unwrap().unwrap();
        assert_eq!(got.url, "https://new.example");
    }

    #[tokio::test]
    async fn huge_ttl_is_a_typed_error_not_a_panic() {
        let store = InMemoryMappingStore::new();
        // Fits in SignedDuration but overflows the timestamp range when
        // added to now.
        let huge = Duration::from_secs(i64::MAX as u64 / 2);

        let err = store
            .put(&code("abc"), &record("abc", "https://example.com"), Some(huge))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));

        let err = store
            .put_if_absent(&code("abc"), &record("abc", "https://example.com"), Some(huge))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));

        // Nothing was stored along the way.
        assert!(store.get(&code("abc")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_cleanup_never_deletes_a_live_replacement() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryMappingStore::new());

        // Seed expired entries, then race a lazy-cleanup read against a
        // writer reclaiming the slot. A reclaimed record must stay
        // resolvable; the reader may only remove what it saw expire.
        for i in 0..50u64 {
            let c = code(&format!("k{i}"));
            store
                .put(
                    &c,
                    &record(&format!("k{i}"), "https://old.example"),
                    Some(Duration::from_millis(1)),
                )
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;

        for i in 0..50u64 {
            let reader = {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let _ = store.get(&code(&format!("k{i}"))).await;
                })
            };
            let writer = {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let c = code(&format!("k{i}"));
                    store
                        .put_if_absent(&c, &record(&format!("k{i}"), "https://new.example"), None)
                        .await
                        .unwrap()
                })
            };

            reader.await.unwrap();
            let written = writer.await.unwrap();

            if written {
                let got = store.get(&code(&format!("k{i}"))).await.unwrap();
                let got = got.expect("reclaimed record must stay resolvable");
                assert_eq!(got.url, "https://new.example");
            }
        }
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryMappingStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code{i}"));
                let r = LinkRecord {
                    code: c.clone(),
                    url: format!("https://example{i}.com"),
                    short_link: format!("https://sho.rt/s/code{i}"),
                };
                store.put(&c, &r, None).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code{i}"));
            let got = store.get(&c).await.unwrap().unwrap();
            assert_eq!(got.url, format!("https://example{i}.com"));
        }
    }
}
