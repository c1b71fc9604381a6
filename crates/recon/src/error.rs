use std::fmt;

use crate::model::Category;

#[derive(Debug, Clone)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Taxonomy validation error (missing category, bad label target, etc.).
    ConfigValidation(String),
    /// A canonical category has no usable patterns and could never match.
    EmptyCategory(Category),
    /// A store label points at something that is not a category or `none`.
    UnknownStoreLabelTarget { label: String, target: String },
    /// Batch document is not valid JSON or has the wrong shape.
    InputParse(String),
    /// One extension's input is unusable; the aggregator excludes it.
    InvalidInput { extension_id: String, reason: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "taxonomy parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "taxonomy validation error: {msg}"),
            Self::EmptyCategory(category) => {
                write!(f, "category '{category}' has no patterns and can never match")
            }
            Self::UnknownStoreLabelTarget { label, target } => {
                write!(f, "store label '{label}': unknown target '{target}' (expected a category or \"none\")")
            }
            Self::InputParse(msg) => write!(f, "input parse error: {msg}"),
            Self::InvalidInput { extension_id, reason } => {
                write!(f, "extension '{extension_id}': {reason}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
