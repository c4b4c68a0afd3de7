use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// The persisted unit: one code→URL mapping.
///
/// Stored as JSON keyed by the bare code. The field names are part of
/// the store layout (`code`, `url`, `short_link`); there is no schema
/// version field, so any future format change has to migrate in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short identifier, unique key in the store.
    pub code: ShortCode,
    /// The original target URL.
    pub url: String,
    /// The fully-qualified redirect URL. Display-only: it is derived
    /// from the code plus the creation-time request context and is not
    /// authoritative.
    pub short_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_store_layout() {
        let record = LinkRecord {
            code: ShortCode::new_unchecked("4GFfc3"),
            url: "https://example.com".to_string(),
            short_link: "https://sho.rt/s/4GFfc3".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "4GFfc3",
                "url": "https://example.com",
                "short_link": "https://sho.rt/s/4GFfc3",
            })
        );
    }

    #[test]
    fn round_trips_through_json() {
        let record = LinkRecord {
            code: ShortCode::new_unchecked("abc"),
            url: "https://example.com/path?q=1".to_string(),
            short_link: "http://localhost/s/abc".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: LinkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
