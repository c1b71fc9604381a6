//! Compiled category taxonomy.
//!
//! Built once from a validated [`ReconConfig`] and shared read-only by the
//! normalizer, extractor, and reconciler. Downstream code iterates
//! [`Taxonomy::categories`] and never assumes how many categories exist.

use std::collections::BTreeMap;

use crate::config::{MatchMode, ReconConfig};
use crate::error::ReconError;
use crate::matcher::{Haystack, PhraseMatcher};
use crate::model::{Category, SourceCategorySet};

#[derive(Debug, Clone)]
pub struct Taxonomy {
    name: String,
    mode: MatchMode,
    match_excerpts: bool,
    first_party_only: bool,
    first_party_actors: Vec<String>,
    categories: Vec<(Category, Vec<PhraseMatcher>)>,
    store_labels: Vec<(PhraseMatcher, Option<Category>)>,
}

impl Taxonomy {
    pub fn compile(config: &ReconConfig) -> Result<Self, ReconError> {
        config.validate()?;

        let mut categories = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let mut matchers: Vec<PhraseMatcher> = Vec::new();
            for pattern in config.patterns(category) {
                if let Some(m) = PhraseMatcher::new(pattern) {
                    if !matchers.iter().any(|existing| existing.phrase() == m.phrase()) {
                        matchers.push(m);
                    }
                }
            }
            // validate() only checks for non-blank text; punctuation-only
            // patterns still compile to nothing.
            if matchers.is_empty() {
                return Err(ReconError::EmptyCategory(category));
            }
            categories.push((category, matchers));
        }

        let mut store_labels = Vec::new();
        for (label, target) in config.resolved_store_labels() {
            let matcher = PhraseMatcher::new(&label).ok_or_else(|| {
                ReconError::ConfigValidation(format!("store label '{label}' has no usable text"))
            })?;
            store_labels.push((matcher, target));
        }

        Ok(Self {
            name: config.name.clone(),
            mode: config.match_mode,
            match_excerpts: config.match_excerpts,
            first_party_only: config.first_party_only,
            first_party_actors: config
                .first_party_actors
                .iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            categories,
            store_labels,
        })
    }

    /// Compile the embedded default taxonomy.
    pub fn builtin() -> Result<Self, ReconError> {
        Self::compile(&ReconConfig::default_taxonomy()?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    pub fn match_excerpts(&self) -> bool {
        self.match_excerpts
    }

    /// The categories this taxonomy classifies into, in presentation order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|(c, _)| *c)
    }

    /// Compiled (lowercased, deduplicated) patterns for one category.
    pub fn patterns(&self, category: Category) -> Vec<&str> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, ms)| ms.iter().map(|m| m.phrase()).collect())
            .unwrap_or_default()
    }

    /// Every category whose pattern set matches anywhere in `text`.
    pub fn categories_matching(&self, text: &str) -> SourceCategorySet {
        self.matches_detail(text).into_keys().collect()
    }

    /// Like [`categories_matching`](Self::categories_matching), but also
    /// reports which patterns fired for each category.
    pub fn matches_detail(&self, text: &str) -> BTreeMap<Category, Vec<String>> {
        let haystack = Haystack::new(text);
        let mut out = BTreeMap::new();
        if haystack.is_blank() {
            return out;
        }
        for (category, matchers) in &self.categories {
            let hits: Vec<String> = matchers
                .iter()
                .filter(|m| m.matches(self.mode, &haystack.text, &haystack.tokens))
                .map(|m| m.phrase().to_string())
                .collect();
            if !hits.is_empty() {
                out.insert(*category, hits);
            }
        }
        out
    }

    /// Categories implied by the store's disclosure headings found in `raw`.
    pub fn store_label_categories(&self, raw: &str) -> SourceCategorySet {
        let haystack = Haystack::new(raw);
        if haystack.is_blank() {
            return SourceCategorySet::new();
        }
        self.store_labels
            .iter()
            .filter(|(m, _)| m.matches(self.mode, &haystack.text, &haystack.tokens))
            .filter_map(|(_, target)| *target)
            .collect()
    }

    /// Whether an actor label names the first-party collector.
    ///
    /// Always true when actor scoping is off or no actor is known.
    pub fn actor_in_scope(&self, actor: Option<&str>) -> bool {
        if !self.first_party_only {
            return true;
        }
        match actor.map(|a| a.trim().to_lowercase()) {
            None => true,
            Some(a) if a.is_empty() => true,
            Some(a) => self.first_party_actors.iter().any(|fp| *fp == a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Taxonomy {
        Taxonomy::builtin().unwrap()
    }

    fn set(cs: &[Category]) -> SourceCategorySet {
        cs.iter().copied().collect()
    }

    #[test]
    fn builtin_covers_every_category_in_order() {
        let t = builtin();
        assert_eq!(t.name(), "default");
        assert_eq!(t.categories().collect::<Vec<_>>(), Category::ALL.to_vec());
        for c in t.categories() {
            assert!(!t.patterns(c).is_empty());
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = builtin();
        assert_eq!(t.categories_matching("IP Address"), set(&[Category::Location]));
        assert_eq!(t.categories_matching("ip address"), set(&[Category::Location]));
        assert_eq!(t.categories_matching("EMAIL ADDRESS"), set(&[Category::Pii]));
    }

    #[test]
    fn plural_mentions_match_singular_patterns() {
        let t = builtin();
        assert_eq!(t.categories_matching("email addresses"), set(&[Category::Pii]));
        assert_eq!(t.categories_matching("IP addresses"), set(&[Category::Location]));
        assert_eq!(t.categories_matching("phone numbers"), set(&[Category::Pii]));
        assert_eq!(t.categories_matching("device identifiers"), set(&[Category::Pii]));
        assert_eq!(
            t.categories_matching("We collect your precise locations"),
            set(&[Category::Location])
        );
        assert!(t.categories_matching("usage statistics").is_empty());
    }

    #[test]
    fn curly_apostrophe_matches_ascii_pattern() {
        let t = builtin();
        let detail = t.matches_detail("driver\u{2019}s license number");
        assert!(detail[&Category::Pii].contains(&"driver's license number".to_string()));
    }

    #[test]
    fn all_matching_categories_are_returned() {
        let t = builtin();
        let got = t.categories_matching("your personal identification number and browsing history");
        assert_eq!(
            got,
            set(&[Category::Pii, Category::Authentication, Category::WebHistory])
        );
    }

    #[test]
    fn negation_is_not_detected() {
        let t = builtin();
        assert_eq!(
            t.categories_matching("we never store your password"),
            set(&[Category::Authentication])
        );
    }

    #[test]
    fn blank_and_unmatched_text_yield_nothing() {
        let t = builtin();
        assert!(t.categories_matching("").is_empty());
        assert!(t.categories_matching("   \n").is_empty());
        assert!(t.categories_matching("favorite color").is_empty());
    }

    #[test]
    fn matches_detail_reports_patterns() {
        let t = builtin();
        let detail = t.matches_detail("credit card number");
        let fin = &detail[&Category::Financial];
        assert!(fin.contains(&"credit card number".to_string()));
        assert!(fin.contains(&"credit card".to_string()));
        assert!(fin.contains(&"card number".to_string()));
        assert_eq!(detail.len(), 1);
    }

    #[test]
    fn store_labels_map_headings() {
        let t = builtin();
        let raw = "Example handles the following:\nPersonally identifiable information\n\
                   Website content\nUser activity\n";
        assert_eq!(
            t.store_label_categories(raw),
            set(&[Category::Pii, Category::WebHistory])
        );
        assert!(t.store_label_categories("Health information").is_empty());
    }

    #[test]
    fn duplicate_patterns_collapse() {
        let mut config = ReconConfig::default_taxonomy().unwrap();
        config
            .categories
            .get_mut("location")
            .unwrap()
            .patterns = vec!["GPS".into(), "gps".into(), " gps ".into()];
        let t = Taxonomy::compile(&config).unwrap();
        assert_eq!(t.patterns(Category::Location), vec!["gps"]);
    }

    #[test]
    fn punctuation_only_category_is_fatal() {
        let mut config = ReconConfig::default_taxonomy().unwrap();
        config.categories.get_mut("financial").unwrap().patterns = vec!["--".into()];
        let err = Taxonomy::compile(&config).unwrap_err();
        assert!(matches!(err, ReconError::EmptyCategory(Category::Financial)));
    }

    #[test]
    fn actor_scope() {
        let mut config = ReconConfig::default_taxonomy().unwrap();
        assert!(Taxonomy::compile(&config).unwrap().actor_in_scope(Some("Google Analytics")));

        config.first_party_only = true;
        let t = Taxonomy::compile(&config).unwrap();
        assert!(t.actor_in_scope(Some("We")));
        assert!(t.actor_in_scope(None));
        assert!(t.actor_in_scope(Some(" ")));
        assert!(!t.actor_in_scope(Some("advertising partners")));
    }
}
