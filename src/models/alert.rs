use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A heading or link whose text mentions one of the keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Page change alert produced by the change detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub source: String,
    pub endpoint: Url,
    pub keywords: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub excerpts: Vec<Excerpt>,
}
