use std::collections::BTreeMap;

use crate::model::{
    Category, ComparisonState, ComparisonSummary, ExtensionComparisonRow, TableWarning,
    WarningKind,
};
use crate::taxonomy::Taxonomy;

/// Compute summary statistics over the finished rows and warnings.
pub fn compute_summary(
    taxonomy: &Taxonomy,
    rows: &[ExtensionComparisonRow],
    warnings: &[TableWarning],
) -> ComparisonSummary {
    let zeroed = || -> BTreeMap<ComparisonState, usize> {
        ComparisonState::ALL.iter().map(|s| (*s, 0)).collect()
    };

    let mut state_totals = zeroed();
    let mut by_category: BTreeMap<Category, BTreeMap<ComparisonState, usize>> =
        taxonomy.categories().map(|c| (c, zeroed())).collect();
    let mut with_discrepancies = 0;

    for row in rows {
        if row.has_discrepancy() {
            with_discrepancies += 1;
        }
        for (category, state) in &row.categories {
            *state_totals.entry(*state).or_insert(0) += 1;
            *by_category
                .entry(*category)
                .or_insert_with(zeroed)
                .entry(*state)
                .or_insert(0) += 1;
        }
    }

    let count = |kind: WarningKind| warnings.iter().filter(|w| w.kind == kind).count();

    ComparisonSummary {
        extensions: rows.len(),
        excluded: count(WarningKind::Excluded),
        upstream_failures: count(WarningKind::UpstreamFailure),
        with_discrepancies,
        state_totals,
        by_category,
    }
}
