use crate::error::{LinkError, Result};
use crate::resolver::{CodeResolver, Resolution};
use crate::settings::ServiceSettings;
use keyhole_core::{LinkRecord, MappingStore, RequestContext, ShortCode, UrlHasher, Xxh32UrlHasher};
use std::sync::Arc;
use tracing::{debug, trace};

/// Orchestrates hasher, encoder, resolver, and store into the two
/// operations the HTTP layer consumes.
///
/// Creation is hash-addressed: resubmitting a URL walks the same
/// candidate codes and returns the existing record instead of minting a
/// new one. Fresh codes are claimed with a conditional write, so two
/// concurrent requests whose hashes collide cannot silently overwrite
/// each other where the store supports `put_if_absent` natively.
#[derive(Debug, Clone)]
pub struct LinkService<S, H = Xxh32UrlHasher> {
    store: Arc<S>,
    resolver: CodeResolver<S, H>,
    settings: ServiceSettings,
}

impl<S: MappingStore> LinkService<S> {
    /// Creates a service with the default xxHash32 hasher.
    pub fn new(store: S, settings: ServiceSettings) -> Self {
        Self::with_hasher(store, Xxh32UrlHasher::new(), settings)
    }
}

impl<S: MappingStore, H: UrlHasher> LinkService<S, H> {
    /// Creates a service with a custom hasher.
    pub fn with_hasher(store: S, hasher: H, settings: ServiceSettings) -> Self {
        let store = Arc::new(store);
        let resolver = CodeResolver::new(
            Arc::clone(&store),
            Arc::new(hasher),
            settings.max_collision_attempts,
        );
        Self {
            store,
            resolver,
            settings,
        }
    }

    /// Creates a short link record for `url`.
    ///
    /// Returns the stored record when the URL already has a live code
    /// (idempotent creation); otherwise claims a fresh code and
    /// persists it with the configured TTL.
    pub async fn generate(&self, url: &str, ctx: &RequestContext) -> Result<LinkRecord> {
        if url.is_empty() {
            return Err(LinkError::InvalidRequest(
                "url must not be empty".to_string(),
            ));
        }

        let mut start = 0;
        // Bounded: each round either returns or re-enters the resolver,
        // which itself gives up after `max_collision_attempts` probes.
        for _ in 0..=self.settings.max_collision_attempts {
            match self.resolver.resolve_from(url, start).await? {
                Resolution::Existing(record) => {
                    debug!(code = %record.code, "Returning existing record for URL");
                    return Ok(record);
                }
                Resolution::Fresh { code, attempt } => {
                    let record = LinkRecord {
                        code: code.clone(),
                        url: url.to_string(),
                        short_link: ctx.short_link(&code),
                    };

                    let written = self
                        .store
                        .put_if_absent(&code, &record, self.settings.default_ttl)
                        .await?;

                    if written {
                        debug!(code = %code, ttl = ?self.settings.default_ttl, "Created short link");
                        return Ok(record);
                    }

                    // Lost the write race for this code. Re-probe from the
                    // same attempt: the occupant is now either an idempotent
                    // hit or a collision the resolver skips past.
                    debug!(code = %code, attempt, "Lost write race, re-resolving");
                    start = attempt;
                }
            }
        }

        Err(LinkError::CodeSpaceExhausted {
            attempts: self.settings.max_collision_attempts,
        })
    }

    /// Resolves a short code to its target URL for redirection.
    ///
    /// Unknown, expired, malformed, and URL-less records all answer
    /// `NotFound`; the HTTP layer turns that into a 404 and a success
    /// into a 302 to the returned URL.
    pub async fn resolve_redirect(&self, code: &str) -> Result<String> {
        trace!(code, "Resolving redirect");

        // A code outside the base-62 alphabet can never have been
        // issued, so it is indistinguishable from an unknown one.
        let Ok(code) = ShortCode::new(code) else {
            return Err(LinkError::NotFound(code.to_string()));
        };

        match self.store.get(&code).await? {
            Some(record) if !record.url.is_empty() => {
                debug!(code = %code, url = %record.url, "Resolved short code");
                Ok(record.url)
            }
            _ => {
                trace!(code = %code, "Short code not found");
                Err(LinkError::NotFound(code.to_string()))
            }
        }
    }
}
