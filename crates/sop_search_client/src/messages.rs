//! `/search` message types. Client ↔ server JSON.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Corpus selector sent with every query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Domain {
    /// Standard operating procedures (backend default).
    #[default]
    Sop,
    /// Customer-support articles.
    Support,
    /// Any other selector value; sent verbatim.
    Other(String),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Sop => "sop",
            Domain::Support => "support",
            Domain::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Domain {
    fn from(value: &str) -> Self {
        match value.trim() {
            "sop" => Domain::Sop,
            "support" => Domain::Support,
            other => Domain::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client → server: search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub domain: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, domain: &Domain) -> Self {
        Self {
            query: query.into(),
            domain: domain.as_str().to_string(),
        }
    }
}

/// One supporting document returned with an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub department: Option<String>,
    #[serde(default)]
    pub relevance: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub preview: String,
}

/// Server → client: either `{error}` or `{answer, sources?}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

/// What a response means to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Failed(String),
    Answered { answer: String, sources: Vec<Source> },
}

impl SearchResponse {
    /// A non-empty `error` field wins over everything else.
    pub fn outcome(self) -> SearchOutcome {
        match self.error.filter(|message| !message.is_empty()) {
            Some(message) => SearchOutcome::Failed(message),
            None => SearchOutcome::Answered {
                answer: self.answer.unwrap_or_default(),
                sources: self.sources.unwrap_or_default(),
            },
        }
    }
}

/// Metadata values may arrive as strings or numbers; null and "" mean absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Like `lenient_text`, but absent values become the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}
