//! `extaudit-recon`: policy vs. disclosure data-category reconciliation.
//!
//! Pure engine crate: receives extracted evidence per extension, returns the
//! per-category comparison table. No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod summary;
pub mod taxonomy;

pub use classify::reconcile;
pub use config::ReconConfig;
pub use engine::{aggregate, aggregate_parsed, load_batch_json, run};
pub use error::ReconError;
pub use evidence::normalize;
pub use extract::extract_categories;
pub use model::{
    Category, ComparisonState, ComparisonTable, EvidenceItem, ExtensionComparisonRow,
    ExtensionInput, SourceCategorySet,
};
pub use taxonomy::Taxonomy;
