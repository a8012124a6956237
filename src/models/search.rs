// Search Models
// Result rows as the index reports them, and the controller's phase

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One ranked match. The index decides ordering and which terms matched;
// the shell only renders what it is told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default)]
    pub matched_terms: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
}

// Lookup lifecycle. `ShowingEmpty` is a real state with its own UI (an
// explicit no-results indication), not a fall-through to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPhase {
    Idle,
    Querying,
    ShowingResults,
    ShowingEmpty,
}

impl SearchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Querying => "querying",
            SearchPhase::ShowingResults => "showing-results",
            SearchPhase::ShowingEmpty => "showing-empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_camel_case() {
        let result = SearchResult {
            title: "Markdown Guide".to_string(),
            url: "/posts/markdown/".to_string(),
            snippet: "Writing posts in markdown".to_string(),
            matched_terms: BTreeSet::from(["markdown".to_string()]),
            published: NaiveDate::from_ymd_opt(2024, 3, 9),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["matchedTerms"][0], "markdown");
        assert_eq!(value["url"], "/posts/markdown/");
        assert_eq!(value["published"], "2024-03-09");
    }

    #[test]
    fn test_published_date_is_optional() {
        let raw = r#"{"title":"About","url":"/about/","snippet":""}"#;
        let result: SearchResult = serde_json::from_str(raw).unwrap();
        assert!(result.published.is_none());
        assert!(result.matched_terms.is_empty());
    }
}
