//! Case-insensitive keyword matching.
//!
//! The default is plain substring containment on lower-cased text, so a
//! short keyword like "eur" also fires inside "europe". `whole_words` turns
//! that off by requiring a non-alphanumeric character (or the text edge) on
//! both sides of the hit.

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    whole_words: bool,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I, whole_words: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords,
            whole_words,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// All keywords present in `text`, in configured order
    pub fn matches(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| self.contains(&lowered, k))
            .cloned()
            .collect()
    }

    /// First configured keyword present in `text`
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| self.contains(&lowered, k))
            .map(String::as_str)
    }

    fn contains(&self, haystack: &str, keyword: &str) -> bool {
        if !self.whole_words {
            return haystack.contains(keyword);
        }

        haystack.match_indices(keyword).any(|(start, _)| {
            let end = start + keyword.len();
            let before = haystack[..start].chars().next_back();
            let after = haystack[end..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    }
}
