use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Default page size when `limit` is not supplied.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: i64 = 500;

// Query-string values arrive as strings; empty strings count as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Cursor pagination parameters shared by every list endpoint.
///
/// `start_after` is the id of the last item of the previous page; pages are
/// re-derivable from it, no offset bookkeeping.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    pub start_after: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_PAGE_SIZE),
            start_after: None,
        }
    }
}

impl PageParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageMeta {
    pub limit: i64,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let params = PageParams::default();
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let params = PageParams {
            limit: Some(10_000),
            start_after: None,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_limit_clamped_to_min() {
        for input in [0, -5] {
            let params = PageParams {
                limit: Some(input),
                start_after: None,
            };
            assert_eq!(params.limit(), 1);
        }
    }

    #[test]
    fn test_deserialize_string_values() {
        let params: PageParams =
            serde_json::from_str(r#"{"limit":"25","start_after":"doc-9"}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.start_after.as_deref(), Some("doc-9"));
    }

    #[test]
    fn test_deserialize_empty_limit_falls_back_to_default() {
        let params: PageParams = serde_json::from_str(r#"{"limit":""}"#).unwrap();
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_meta_omits_absent_cursor() {
        let meta = PageMeta {
            limit: 50,
            has_more: false,
            next_cursor: None,
        };
        let serialized = serde_json::to_string(&meta).unwrap();
        assert!(!serialized.contains("next_cursor"));
    }
}
