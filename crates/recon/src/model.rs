use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// The canonical privacy data classes used as the comparison axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pii,
    Financial,
    Authentication,
    Location,
    WebHistory,
}

impl Category {
    /// Every canonical category, in presentation order.
    pub const ALL: [Category; 5] = [
        Self::Pii,
        Self::Financial,
        Self::Authentication,
        Self::Location,
        Self::WebHistory,
    ];

    /// Stable machine key, as used in taxonomy files and JSON output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pii => "pii",
            Self::Financial => "financial",
            Self::Authentication => "authentication",
            Self::Location => "location",
            Self::WebHistory => "web_history",
        }
    }

    /// Column heading for human-facing reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pii => "PII",
            Self::Financial => "Financial/Payment",
            Self::Authentication => "Authentication",
            Self::Location => "Location",
            Self::WebHistory => "Web History",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Categories mentioned by one source for one extension.
pub type SourceCategorySet = BTreeSet<Category>;

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Policy,
    Disclosure,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Policy => write!(f, "policy"),
            Self::Disclosure => write!(f, "disclosure"),
        }
    }
}

/// One observed mention from either source, after the ingestion adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceItem {
    pub source: SourceKind,
    /// Data-type string (graph node) or normalized mention (disclosure).
    pub data_type: String,
    /// Surrounding source text, when the extractor supplied one.
    pub excerpt: Option<String>,
    /// Collecting party. Policy evidence only.
    pub actor: Option<String>,
}

/// Relationship tuple emitted by the policy knowledge-graph extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTuple {
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    pub data_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Normalized data-type mention emitted by the disclosure preprocessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureMention {
    pub mention: String,
    #[serde(default)]
    pub span: Option<String>,
}

/// Everything one upstream collaborator produced for one extension.
///
/// `failure` is set when the upstream step failed outright (crawl error,
/// preprocessor timeout). `items` may still be empty without a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEvidence<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub failure: Option<String>,
}

impl<T> Default for SourceEvidence<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failure: None,
        }
    }
}

impl<T> SourceEvidence<T> {
    pub fn items(items: Vec<T>) -> Self {
        Self { items, failure: None }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(reason.into()),
        }
    }
}

/// Per-extension input to the aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionInput {
    pub extension_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy: SourceEvidence<PolicyTuple>,
    #[serde(default)]
    pub disclosure: SourceEvidence<DisclosureMention>,
    /// Raw platform disclosure text, used when the preprocessed mentions
    /// yield no category.
    #[serde(default)]
    pub raw_disclosure: Option<String>,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonState {
    Neither,
    DisclosureOnly,
    PolicyOnly,
    Both,
}

impl ComparisonState {
    pub const ALL: [ComparisonState; 4] = [
        Self::Neither,
        Self::DisclosureOnly,
        Self::PolicyOnly,
        Self::Both,
    ];

    /// The state seen with the two sources swapped.
    pub fn mirrored(self) -> Self {
        match self {
            Self::DisclosureOnly => Self::PolicyOnly,
            Self::PolicyOnly => Self::DisclosureOnly,
            other => other,
        }
    }

    /// True when exactly one source mentions the category.
    pub fn is_discrepancy(self) -> bool {
        matches!(self, Self::DisclosureOnly | Self::PolicyOnly)
    }
}

impl std::fmt::Display for ComparisonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neither => write!(f, "neither"),
            Self::DisclosureOnly => write!(f, "disclosure_only"),
            Self::PolicyOnly => write!(f, "policy_only"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Where the disclosure side of a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureBasis {
    Evidence,
    StoreLabels,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionComparisonRow {
    pub extension_id: String,
    pub name: String,
    pub categories: BTreeMap<Category, ComparisonState>,
    pub policy_analyzed: bool,
    pub disclosure_analyzed: bool,
    pub disclosure_basis: DisclosureBasis,
    pub notes: Vec<String>,
}

impl ExtensionComparisonRow {
    pub fn state(&self, category: Category) -> ComparisonState {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or(ComparisonState::Neither)
    }

    pub fn has_discrepancy(&self) -> bool {
        self.categories.values().any(|s| s.is_discrepancy())
    }
}

// ---------------------------------------------------------------------------
// Table + warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// An upstream extractor failed; the row was still produced.
    UpstreamFailure,
    /// The extension was left out of the table.
    Excluded,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableWarning {
    pub extension_id: String,
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub extensions: usize,
    pub excluded: usize,
    pub upstream_failures: usize,
    pub with_discrepancies: usize,
    pub state_totals: BTreeMap<ComparisonState, usize>,
    pub by_category: BTreeMap<Category, BTreeMap<ComparisonState, usize>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMeta {
    pub taxonomy_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Terminal artifact handed to exporters. Rows keep input order.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTable {
    pub meta: ComparisonMeta,
    pub summary: ComparisonSummary,
    pub rows: Vec<ExtensionComparisonRow>,
    pub warnings: Vec<TableWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_round_trip() {
        for c in Category::ALL {
            assert_eq!(c.key().parse::<Category>().unwrap(), c);
        }
        assert_eq!(" Web_History ".parse::<Category>().unwrap(), Category::WebHistory);
        assert!("health".parse::<Category>().is_err());
    }

    #[test]
    fn mirrored_swaps_only_one_sided_states() {
        assert_eq!(ComparisonState::PolicyOnly.mirrored(), ComparisonState::DisclosureOnly);
        assert_eq!(ComparisonState::DisclosureOnly.mirrored(), ComparisonState::PolicyOnly);
        assert_eq!(ComparisonState::Both.mirrored(), ComparisonState::Both);
        assert_eq!(ComparisonState::Neither.mirrored(), ComparisonState::Neither);
    }

    #[test]
    fn row_serializes_with_stable_keys() {
        let mut categories = BTreeMap::new();
        categories.insert(Category::Pii, ComparisonState::Both);
        categories.insert(Category::WebHistory, ComparisonState::DisclosureOnly);
        let row = ExtensionComparisonRow {
            extension_id: "abc".into(),
            name: "Demo".into(),
            categories,
            policy_analyzed: true,
            disclosure_analyzed: false,
            disclosure_basis: DisclosureBasis::StoreLabels,
            notes: vec![],
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["categories"]["pii"], "both");
        assert_eq!(json["categories"]["web_history"], "disclosure_only");
        assert_eq!(json["disclosure_basis"], "store_labels");
        assert!(row.has_discrepancy());
    }

    #[test]
    fn extension_input_defaults_missing_sources() {
        let input: ExtensionInput =
            serde_json::from_str(r#"{ "extension_id": "x" }"#).unwrap();
        assert!(input.policy.items.is_empty());
        assert!(input.policy.failure.is_none());
        assert!(input.disclosure.items.is_empty());
        assert!(input.raw_disclosure.is_none());
    }
}
