use crate::config::MatchMode;

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Lowercase and fold typographic apostrophes to `'`.
pub fn fold_text(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Lowercase, split on anything that is not alphanumeric or an apostrophe.
pub fn tokenize(text: &str) -> Vec<String> {
    fold_text(text)
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|s| s.trim_matches('\''))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Phrase matcher
// ---------------------------------------------------------------------------

/// One compiled pattern.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
    tokens: Vec<String>,
}

impl PhraseMatcher {
    /// Returns `None` for patterns with no usable content.
    pub fn new(pattern: &str) -> Option<Self> {
        let phrase = fold_text(pattern.trim());
        let tokens = tokenize(&phrase);
        if phrase.is_empty() || tokens.is_empty() {
            return None;
        }
        Some(Self { phrase, tokens })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// `text` must be the lowercased haystack; `tokens` its tokenization.
    pub fn matches(&self, mode: MatchMode, text: &str, tokens: &[String]) -> bool {
        match mode {
            MatchMode::Substring => text.contains(&self.phrase),
            MatchMode::Token => contains_run(tokens, &self.tokens),
        }
    }
}

/// Prepared haystack: lowercased once, tokenized once.
#[derive(Debug)]
pub struct Haystack {
    pub text: String,
    pub tokens: Vec<String>,
}

impl Haystack {
    pub fn new(text: &str) -> Self {
        Self {
            text: fold_text(text),
            tokens: tokenize(text),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// `plural` is `singular` + `s`/`es`, or `singular` with a final `y` as `ies`.
fn is_plural_of(singular: &str, plural: &str) -> bool {
    if let Some(stem) = plural.strip_suffix("ies") {
        if singular.strip_suffix('y') == Some(stem) && !stem.is_empty() {
            return true;
        }
    }
    plural
        .strip_suffix('s')
        .is_some_and(|rest| rest == singular || rest.strip_suffix('e') == Some(singular))
}

/// Whole-word equality that tolerates a regular plural on either side.
fn same_word(a: &str, b: &str) -> bool {
    a == b || is_plural_of(a, b) || is_plural_of(b, a)
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|w| w.iter().zip(needle).all(|(h, n)| same_word(h, n)))
}
