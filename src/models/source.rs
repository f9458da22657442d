use serde::{Deserialize, Serialize};
use url::Url;

/// A named document watched by the change detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub endpoint: Url,
}

impl Source {
    pub fn new(name: impl Into<String>, endpoint: Url) -> Self {
        Self {
            name: name.into(),
            endpoint,
        }
    }

    /// Parse a `name=url` pair. Returns `None` when either half is missing
    /// or the url does not parse.
    pub fn parse_pair(pair: &str) -> Option<Self> {
        let (name, endpoint) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let endpoint = Url::parse(endpoint.trim()).ok()?;
        Some(Self::new(name, endpoint))
    }
}
