//! Snippet domain entity and related types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::Pagination;

/// A stored snippet.
///
/// Snippets are never removed; a snippet whose `expires_at` lies in the past
/// is treated as deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Snippet {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Validated input for a new snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub content: String,
    pub expires_at: DateTime<Utc>,
}

/// Snippet as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SnippetResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hello")]
    pub title: String,
    #[schema(example = "fn main() {}")]
    pub content: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub expires_at: DateTime<Utc>,
}

impl From<Snippet> for SnippetResponse {
    fn from(snippet: Snippet) -> Self {
        Self {
            id: snippet.id,
            title: snippet.title,
            content: snippet.content,
            created_at: snippet.created_at,
            expires_at: snippet.expires_at,
        }
    }
}

/// One page of snippets
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SnippetList {
    pub snippets: Vec<SnippetResponse>,
    pub pagination: Pagination,
}

impl SnippetList {
    pub fn new(snippets: Vec<Snippet>, pagination: Pagination) -> Self {
        Self {
            snippets: snippets.into_iter().map(SnippetResponse::from).collect(),
            pagination,
        }
    }
}

/// RFC 3339 timestamps with second precision and a `Z` suffix.
mod rfc3339 {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn snippet() -> Snippet {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Snippet {
            id: 7,
            title: "title".to_string(),
            content: "content".to_string(),
            created_at: created,
            updated_at: created,
            expires_at: created + Duration::days(1),
        }
    }

    #[test]
    fn test_response_hides_updated_at() {
        let json = serde_json::to_value(SnippetResponse::from(snippet())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
        assert_eq!(json["expires_at"], "2024-05-02T12:00:00Z");
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn test_is_expired() {
        let s = snippet();
        assert!(!s.is_expired(s.created_at));
        assert!(s.is_expired(s.expires_at));
    }
}
