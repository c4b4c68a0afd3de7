use crate::error::{LinkError, Result};
use keyhole_core::base62::encode_base62;
use keyhole_core::{LinkRecord, MappingStore, ShortCode, UrlHasher};
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of collision resolution for one URL.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The code is unmapped and safe to claim. `attempt` records which
    /// probe produced it, so a caller that loses the subsequent write
    /// race can resume probing from the same point.
    Fresh { code: ShortCode, attempt: u32 },
    /// The code already maps this exact URL; creation is idempotent and
    /// the stored record is the answer.
    Existing(LinkRecord),
}

/// Decides the final code for a URL by probing the store.
///
/// The candidate for attempt 0 is `encode(hash(url))`. Each later
/// attempt re-hashes the URL with the attempt counter appended, so the
/// probe sequence is deterministic: replaying the same URL walks the
/// same candidates and lands on the idempotent hit instead of minting a
/// new code.
///
/// A candidate mapped to a *different* URL is a genuine collision and
/// the probe advances. The loop is bounded; exhausting it yields a
/// typed `CodeSpaceExhausted`, never an unbounded retry.
#[derive(Debug, Clone)]
pub struct CodeResolver<S, H> {
    store: Arc<S>,
    hasher: Arc<H>,
    max_attempts: u32,
}

impl<S: MappingStore, H: UrlHasher> CodeResolver<S, H> {
    pub fn new(store: Arc<S>, hasher: Arc<H>, max_attempts: u32) -> Self {
        Self {
            store,
            hasher,
            max_attempts,
        }
    }

    /// Returns the deterministic candidate code for a given probe.
    pub fn candidate(&self, url: &str, attempt: u32) -> ShortCode {
        let hash = if attempt == 0 {
            self.hasher.hash(url)
        } else {
            self.hasher.hash(&format!("{url}#{attempt}"))
        };
        ShortCode::new_unchecked(encode_base62(u64::from(hash)))
    }

    /// Resolves the final code for `url`, starting from the first probe.
    pub async fn resolve(&self, url: &str) -> Result<Resolution> {
        self.resolve_from(url, 0).await
    }

    /// Resolves the final code for `url`, starting at probe `start`.
    pub async fn resolve_from(&self, url: &str, start: u32) -> Result<Resolution> {
        for attempt in start..self.max_attempts {
            let code = self.candidate(url, attempt);
            trace!(code = %code, attempt, "Probing candidate code");

            match self.store.get(&code).await? {
                None => {
                    return Ok(Resolution::Fresh { code, attempt });
                }
                Some(record) if record.url == url => {
                    debug!(code = %code, "Code already maps this URL");
                    return Ok(Resolution::Existing(record));
                }
                Some(_) => {
                    debug!(code = %code, attempt, "Candidate collides with a different URL");
                }
            }
        }

        Err(LinkError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
