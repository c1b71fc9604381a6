use std::collections::BTreeMap;

use crate::model::{Category, ComparisonState, SourceCategorySet};
use crate::taxonomy::Taxonomy;

/// Agreement state for one category.
pub fn classify(in_policy: bool, in_disclosure: bool) -> ComparisonState {
    match (in_policy, in_disclosure) {
        (true, true) => ComparisonState::Both,
        (true, false) => ComparisonState::PolicyOnly,
        (false, true) => ComparisonState::DisclosureOnly,
        (false, false) => ComparisonState::Neither,
    }
}

/// Classify every taxonomy category for one extension.
///
/// Total over the taxonomy: categories absent from both sets are `Neither`.
/// Swapping the arguments mirrors the `*_only` states and nothing else.
pub fn reconcile(
    taxonomy: &Taxonomy,
    policy: &SourceCategorySet,
    disclosure: &SourceCategorySet,
) -> BTreeMap<Category, ComparisonState> {
    taxonomy
        .categories()
        .map(|c| (c, classify(policy.contains(&c), disclosure.contains(&c))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cs: &[Category]) -> SourceCategorySet {
        cs.iter().copied().collect()
    }

    #[test]
    fn four_states() {
        assert_eq!(classify(true, true), ComparisonState::Both);
        assert_eq!(classify(true, false), ComparisonState::PolicyOnly);
        assert_eq!(classify(false, true), ComparisonState::DisclosureOnly);
        assert_eq!(classify(false, false), ComparisonState::Neither);
    }

    #[test]
    fn mixed_sets() {
        let t = Taxonomy::builtin().unwrap();
        let policy = set(&[Category::Pii, Category::Location]);
        let disclosure = set(&[Category::Location, Category::WebHistory]);
        let row = reconcile(&t, &policy, &disclosure);

        assert_eq!(row.len(), t.categories().count());
        assert_eq!(row[&Category::Pii], ComparisonState::PolicyOnly);
        assert_eq!(row[&Category::Financial], ComparisonState::Neither);
        assert_eq!(row[&Category::Authentication], ComparisonState::Neither);
        assert_eq!(row[&Category::Location], ComparisonState::Both);
        assert_eq!(row[&Category::WebHistory], ComparisonState::DisclosureOnly);
    }

    #[test]
    fn swapped_sources_mirror() {
        let t = Taxonomy::builtin().unwrap();
        let a = set(&[Category::Pii, Category::Financial]);
        let b = set(&[Category::Financial, Category::Authentication]);
        let ab = reconcile(&t, &a, &b);
        let ba = reconcile(&t, &b, &a);
        for c in t.categories() {
            assert_eq!(ab[&c], ba[&c].mirrored());
        }
    }
}
