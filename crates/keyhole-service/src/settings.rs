use std::time::Duration;
use typed_builder::TypedBuilder;

/// Tunables for the link service, supplied by the deployment's config
/// loader.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// TTL applied to every newly created record. `None` means records
    /// persist until externally evicted.
    #[builder(default)]
    pub default_ttl: Option<Duration>,

    /// Upper bound on collision-resolution probes before giving up
    /// with `CodeSpaceExhausted`. Practically unreachable under a
    /// well-distributed hash.
    #[builder(default = 5)]
    pub max_collision_attempts: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
