//! Token frequency tracking with a count-ordered top-N view.
//!
//! A [`TokenCounter`] keeps a plain `token -> count` map, so recording an
//! occurrence is a single hash update. The ranking is materialized only
//! when someone asks for it: every entry is copied out and sorted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Matches either an explicit `http(s)://` scheme or a bare
/// `host.tld[:port][/path]`.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(http|https)://|[a-z0-9]+([\-.][a-z0-9]+)*\.[a-z]{2,6}(:[0-9]{1,5})?(/.*)?$")
        .expect("URL pattern is valid")
});

/// Whether a whitespace-delimited word counts as a URL token.
#[inline]
pub fn is_url(word: &str) -> bool {
    URL_REGEX.is_match(word)
}

/// Which tokens a counter extracts from message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// URL-shaped words, kept verbatim.
    Url,
    /// Every other word, trimmed of surrounding punctuation and lowercased.
    Word,
}

impl TokenKind {
    /// Extract this kind's tokens from `text`.
    pub fn tokens(self, text: &str) -> impl Iterator<Item = String> + '_ {
        text.split_whitespace().filter_map(move |word| match self {
            TokenKind::Url => is_url(word).then(|| word.to_owned()),
            TokenKind::Word if is_url(word) => None,
            TokenKind::Word => {
                let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
                (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
            }
        })
    }
}

/// A token and how many times it has been seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopToken {
    pub token: String,
    pub count: u64,
}

/// Occurrence counts for an open-ended set of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounter {
    kind: TokenKind,
    all: HashMap<String, u64>,
}

impl TokenCounter {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            all: HashMap::new(),
        }
    }

    pub fn urls() -> Self {
        Self::new(TokenKind::Url)
    }

    pub fn words() -> Self {
        Self::new(TokenKind::Word)
    }

    /// Count one more occurrence of `token`.
    pub fn record_occurrence(&mut self, token: &str) {
        if let Some(count) = self.all.get_mut(token) {
            *count += 1;
        } else {
            self.all.insert(token.to_owned(), 1);
        }
    }

    /// Record every token of this counter's kind found in `text`.
    pub fn add_text(&mut self, text: &str) {
        for token in self.kind.tokens(text) {
            self.record_occurrence(&token);
        }
    }

    /// Current count for `token` (0 if never seen).
    pub fn count(&self, token: &str) -> u64 {
        self.all.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// The `n` most frequent tokens, highest count first.
    ///
    /// `n` is clamped to the number of distinct tokens. Equal counts are
    /// ordered by token text so the result is stable across restarts.
    pub fn top(&self, n: usize) -> Vec<TopToken> {
        let mut list: Vec<(&String, &u64)> = self.all.iter().collect();
        list.sort_unstable_by(|a, b| rank(a, b));
        list.truncate(n);
        list.into_iter()
            .map(|(token, count)| TopToken {
                token: token.clone(),
                count: *count,
            })
            .collect()
    }
}

fn rank(a: &(&String, &u64), b: &(&String, &u64)) -> Ordering {
    b.1.cmp(a.1).then_with(|| a.0.cmp(b.0))
}
