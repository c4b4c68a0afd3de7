use crate::shortcode::ShortCode;

/// Per-request context handed in by the HTTP layer.
///
/// Carries the externally visible scheme and host used to build the
/// display short link. The core never inspects headers itself; picking
/// `x-forwarded-proto` over the raw scheme is the HTTP layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    scheme: String,
    host: String,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Builds the fully-qualified short link for a code, using the
    /// `/s/<code>` path the redirect endpoint is mounted on.
    pub fn short_link(&self, code: &ShortCode) -> String {
        format!("{}://{}/s/{}", self.scheme, self.host, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_short_link_under_s_path() {
        let ctx = RequestContext::new("https", "sho.rt");
        let code = ShortCode::new_unchecked("4GFfc3");
        assert_eq!(ctx.short_link(&code), "https://sho.rt/s/4GFfc3");
    }

    #[test]
    fn host_may_carry_a_port() {
        let ctx = RequestContext::new("http", "localhost:3000");
        let code = ShortCode::new_unchecked("abc");
        assert_eq!(ctx.short_link(&code), "http://localhost:3000/s/abc");
    }
}
