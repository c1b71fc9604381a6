use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Category;

/// Built-in taxonomy shipped with the engine.
pub const DEFAULT_TAXONOMY_TOML: &str = include_str!("../taxonomy/default.toml");

/// Store-label target that maps a heading to no category.
pub const NO_CATEGORY: &str = "none";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Also match the policy tuple's source-text excerpt, not just its data type.
    #[serde(default)]
    pub match_excerpts: bool,
    /// Drop policy evidence attributed to an actor outside `first_party_actors`.
    #[serde(default)]
    pub first_party_only: bool,
    #[serde(default = "default_first_party_actors")]
    pub first_party_actors: Vec<String>,
    /// Keyed by category key (`pii`, `web_history`, ...). Checked in `validate`.
    pub categories: BTreeMap<String, CategoryConfig>,
    /// Store disclosure heading -> category key or `none`.
    #[serde(default)]
    pub store_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Whole-word phrase match.
    #[default]
    Token,
    /// Raw substring match.
    Substring,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

fn default_first_party_actors() -> Vec<String> {
    vec!["we".into(), "us".into(), "first party".into()]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The taxonomy embedded in the crate.
    pub fn default_taxonomy() -> Result<Self, ReconError> {
        Self::from_toml(DEFAULT_TAXONOMY_TOML)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        for key in self.categories.keys() {
            key.parse::<Category>().map_err(ReconError::ConfigValidation)?;
        }

        // Every canonical category needs at least one usable pattern
        for category in Category::ALL {
            let usable = self
                .categories
                .get(category.key())
                .map(|c| c.patterns.iter().any(|p| !p.trim().is_empty()))
                .unwrap_or(false);
            if !usable {
                return Err(ReconError::EmptyCategory(category));
            }
        }

        for (label, target) in &self.store_labels {
            if label.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "store label headings must not be empty".into(),
                ));
            }
            if target != NO_CATEGORY && target.parse::<Category>().is_err() {
                return Err(ReconError::UnknownStoreLabelTarget {
                    label: label.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(())
    }

    /// Patterns configured for one category, as written in the file.
    pub fn patterns(&self, category: Category) -> &[String] {
        self.categories
            .get(category.key())
            .map(|c| c.patterns.as_slice())
            .unwrap_or(&[])
    }

    /// Resolved store labels; `none` targets map to `None`.
    pub fn resolved_store_labels(&self) -> Vec<(String, Option<Category>)> {
        self.store_labels
            .iter()
            .map(|(label, target)| (label.clone(), target.parse::<Category>().ok()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
