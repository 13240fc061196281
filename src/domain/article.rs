//! Article suggestions from the backend's search index.
//!
//! Articles are owned by the remote service and read-only on the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A known article name with its usage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            usage_count: 0,
            score: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// How the backend produced the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Text search on the query.
    Search,
    /// Most used articles (empty or missing query).
    Popular,
}

/// Body of `GET /articles/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSearchResponse {
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "type")]
    pub kind: SearchKind,
}
