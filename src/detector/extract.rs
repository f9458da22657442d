//! Plain text and titled elements from an HTML document.

use scraper::{Html, Selector};

use crate::error::{Result, WatchError};

const TITLED_SELECTOR: &str = "h1, h2, h3, a";

/// Heading or link text with the anchor target when there is one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitledElement {
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Every text node trimmed and joined with single spaces
    pub text: String,
    /// Titled elements in document order
    pub titled: Vec<TitledElement>,
}

pub fn extract_document(body: &str) -> Result<ExtractedDocument> {
    if body.trim().is_empty() {
        return Err(WatchError::Parse("empty document".into()));
    }

    let document = Html::parse_document(body);

    let text = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let selector = Selector::parse(TITLED_SELECTOR)
        .map_err(|e| WatchError::Parse(format!("invalid selector {}: {:?}", TITLED_SELECTOR, e)))?;

    let titled = document
        .select(&selector)
        .filter_map(|element| {
            let text = collapse_whitespace(&element.text().collect::<String>());
            if text.is_empty() {
                return None;
            }
            let link = if element.value().name() == "a" {
                element
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|href| !href.is_empty())
                    .map(str::to_string)
            } else {
                None
            };
            Some(TitledElement { text, link })
        })
        .collect();

    Ok(ExtractedDocument { text, titled })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
