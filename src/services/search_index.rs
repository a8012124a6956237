// Search Index Service
// The shell consumes the index as a black box: a query string in, a
// relevance-ordered result list out. Production builds back this with
// the generated on-disk index; `StaticIndex` is the development
// stand-in the preview server uses before an index exists.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::models::SearchResult;

const SNIPPET_CONTEXT_BYTES: usize = 80;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap())
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index lookup failed: {0}")]
    Lookup(String),

    #[error("index returned a malformed response: {0}")]
    Malformed(String),
}

/// Queryable search capability. Callers must short-circuit empty
/// queries; the index never sees them. Ordering is the index's own
/// ranking and is preserved verbatim by the controller.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, IndexError>;
}

/// One page of site content fed to the development index.
#[derive(Debug, Clone)]
pub struct IndexedPage {
    pub title: String,
    pub url: String,
    pub body: String,
    pub published: Option<NaiveDate>,
}

/// In-memory index over the site's pages. Case-insensitive token
/// matching, title hits weighted over body hits, ties broken by page
/// order. Good enough to exercise the overlay end to end in dev mode.
pub struct StaticIndex {
    pages: Vec<IndexedPage>,
}

impl StaticIndex {
    pub fn new(pages: Vec<IndexedPage>) -> Self {
        Self { pages }
    }

    fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        word_pattern()
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn score_page(page: &IndexedPage, terms: &[String]) -> (u32, BTreeSet<String>) {
        let title = page.title.to_lowercase();
        let body = page.body.to_lowercase();

        let mut score = 0u32;
        let mut matched = BTreeSet::new();

        for term in terms {
            let in_title = title.contains(term.as_str());
            let in_body = body.contains(term.as_str());
            if in_title {
                score += 3;
            }
            if in_body {
                score += 1;
            }
            if in_title || in_body {
                matched.insert(term.clone());
            }
        }

        (score, matched)
    }

    /// A short excerpt around the first matched term, clamped to char
    /// boundaries. Falls back to the head of the body when the match
    /// was title-only.
    fn snippet(page: &IndexedPage, matched: &BTreeSet<String>) -> String {
        let body = page.body.as_str();
        let lowered = body.to_lowercase();

        let hit = matched
            .iter()
            .filter_map(|term| lowered.find(term.as_str()))
            .min();

        let center = match hit {
            Some(pos) => pos,
            None => 0,
        };

        let mut start = center.saturating_sub(SNIPPET_CONTEXT_BYTES);
        let mut end = (center + SNIPPET_CONTEXT_BYTES).min(body.len());
        while start > 0 && !body.is_char_boundary(start) {
            start -= 1;
        }
        while end < body.len() && !body.is_char_boundary(end) {
            end += 1;
        }

        let mut snippet = String::new();
        if start > 0 {
            snippet.push('…');
        }
        snippet.push_str(body[start..end].trim());
        if end < body.len() {
            snippet.push('…');
        }
        snippet
    }
}

#[async_trait]
impl SearchIndex for StaticIndex {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, IndexError> {
        let terms = Self::tokenize(text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(u32, usize, SearchResult)> = Vec::new();
        for (position, page) in self.pages.iter().enumerate() {
            let (score, matched) = Self::score_page(page, &terms);
            if score == 0 {
                continue;
            }

            let snippet = Self::snippet(page, &matched);
            scored.push((
                score,
                position,
                SearchResult {
                    title: page.title.clone(),
                    url: page.url.clone(),
                    snippet,
                    matched_terms: matched,
                    published: page.published,
                },
            ));
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        log::debug!("Dev index matched {} page(s) for '{text}'", scored.len());

        Ok(scored.into_iter().map(|(_, _, result)| result).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pages() -> Vec<IndexedPage> {
        vec![
            IndexedPage {
                title: "Markdown Example".to_string(),
                url: "/posts/markdown/".to_string(),
                body: "A simple example of writing a blog post in markdown, \
                       with tables, footnotes and code blocks."
                    .to_string(),
                published: NaiveDate::from_ymd_opt(2024, 3, 9),
            },
            IndexedPage {
                title: "Video Embeds".to_string(),
                url: "/posts/video/".to_string(),
                body: "Embedding videos from YouTube inside markdown content.".to_string(),
                published: NaiveDate::from_ymd_opt(2024, 4, 2),
            },
            IndexedPage {
                title: "About".to_string(),
                url: "/about/".to_string(),
                body: "About this site and its author.".to_string(),
                published: None,
            },
        ]
    }

    #[tokio::test]
    async fn test_title_matches_rank_first() {
        let index = StaticIndex::new(sample_pages());
        let results = index.query("markdown").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "/posts/markdown/");
        assert_eq!(results[1].url, "/posts/video/");
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive_and_reports_terms() {
        let index = StaticIndex::new(sample_pages());
        let results = index.query("MARKDOWN tables").await.unwrap();

        let top = &results[0];
        assert!(top.matched_terms.contains("markdown"));
        assert!(top.matched_terms.contains("tables"));
        assert!(top.snippet.contains("markdown"));
    }

    #[tokio::test]
    async fn test_unmatched_query_returns_empty() {
        let index = StaticIndex::new(sample_pages());
        let results = index.query("xyzabc123nonexistent").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_punctuation_only_query_returns_empty() {
        let index = StaticIndex::new(sample_pages());
        let results = index.query("&&& !!!").await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_snippet_clamps_to_char_boundaries() {
        let page = IndexedPage {
            title: "Unicode".to_string(),
            url: "/posts/unicode/".to_string(),
            body: "héllo wörld — ".repeat(40) + "needle" + &" héllo wörld".repeat(40),
            published: None,
        };
        let matched = BTreeSet::from(["needle".to_string()]);

        let snippet = StaticIndex::snippet(&page, &matched);
        assert!(snippet.contains("needle"));
        assert!(snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));
    }
}
