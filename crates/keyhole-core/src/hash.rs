use xxhash_rust::xxh32::xxh32;

/// Seed for the default hasher. Fixed forever: the hash output feeds the
/// encoder, so changing it would silently remap every existing link.
const XXH32_SEED: u32 = 0;

/// A deterministic, non-cryptographic hash over the input URL.
///
/// Implementations must return the same value for the same input across
/// process restarts. Good avalanche behavior is expected; collision
/// resistance is not — the code resolver owns collision handling.
pub trait UrlHasher: Send + Sync + 'static {
    /// Hashes a URL string into a fixed-width 32-bit value.
    fn hash(&self, url: &str) -> u32;
}

/// The default [`UrlHasher`], backed by xxHash32 with a fixed seed.
#[derive(Debug, Clone, Default)]
pub struct Xxh32UrlHasher {
    seed: u32,
}

impl Xxh32UrlHasher {
    /// Creates a hasher with the canonical seed.
    pub fn new() -> Self {
        Self { seed: XXH32_SEED }
    }

    /// Creates a hasher with a custom seed.
    ///
    /// Only useful for deployments that intentionally partition their
    /// code space; mixed seeds against one store will not resolve each
    /// other's links.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl UrlHasher for Xxh32UrlHasher {
    fn hash(&self, url: &str) -> u32 {
        xxh32(url.as_bytes(), self.seed)
    }
}
