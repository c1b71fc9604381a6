use crate::evidence::normalize;
use crate::model::{EvidenceItem, SourceCategorySet};
use crate::taxonomy::Taxonomy;

/// Union of [`normalize`] over every item from one source.
///
/// Order-independent: upstream extractors do not guarantee stable ordering.
pub fn extract_categories(taxonomy: &Taxonomy, items: &[EvidenceItem]) -> SourceCategorySet {
    let mut found = SourceCategorySet::new();
    for item in items {
        found.extend(normalize(taxonomy, item));
    }
    found
}
