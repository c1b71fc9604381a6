use std::collections::HashSet;

use serde::Deserialize;

use crate::classify::reconcile;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::extract::extract_categories;
use crate::model::{
    ComparisonMeta, ComparisonTable, DisclosureBasis, EvidenceItem, ExtensionComparisonRow,
    ExtensionInput, SourceKind, TableWarning, WarningKind,
};
use crate::summary::compute_summary;
use crate::taxonomy::Taxonomy;

/// Compile the taxonomy and compare every extension.
///
/// The only fatal error is a malformed taxonomy; per-extension problems end
/// up in the table's warnings.
pub fn run(config: &ReconConfig, inputs: &[ExtensionInput]) -> Result<ComparisonTable, ReconError> {
    let taxonomy = Taxonomy::compile(config)?;
    Ok(aggregate(&taxonomy, inputs))
}

/// Compare every extension, in input order.
pub fn aggregate(taxonomy: &Taxonomy, inputs: &[ExtensionInput]) -> ComparisonTable {
    aggregate_entries(taxonomy, inputs.iter().map(Ok))
}

/// Like [`aggregate`], for batches where some entries already failed to parse.
pub fn aggregate_parsed(
    taxonomy: &Taxonomy,
    entries: &[Result<ExtensionInput, ReconError>],
) -> ComparisonTable {
    aggregate_entries(taxonomy, entries.iter().map(|e| e.as_ref().map_err(Clone::clone)))
}

fn aggregate_entries<'a>(
    taxonomy: &Taxonomy,
    entries: impl Iterator<Item = Result<&'a ExtensionInput, ReconError>>,
) -> ComparisonTable {
    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, entry) in entries.enumerate() {
        let outcome = entry.and_then(|input| compare_extension(taxonomy, input, index, &seen));
        match outcome {
            Ok((row, row_warnings)) => {
                seen.insert(row.extension_id.clone());
                rows.push(row);
                warnings.extend(row_warnings);
            }
            Err(err) => {
                log::warn!("excluding extension #{index}: {err}");
                let (extension_id, reason) = match err {
                    ReconError::InvalidInput { extension_id, reason } => (extension_id, reason),
                    other => (format!("#{index}"), other.to_string()),
                };
                warnings.push(TableWarning {
                    extension_id,
                    kind: WarningKind::Excluded,
                    source: None,
                    reason,
                });
            }
        }
    }

    let summary = compute_summary(taxonomy, &rows, &warnings);
    log::info!(
        "compared {} extension(s): {} with discrepancies, {} excluded, {} upstream failure(s)",
        summary.extensions,
        summary.with_discrepancies,
        summary.excluded,
        summary.upstream_failures,
    );

    ComparisonTable {
        meta: ComparisonMeta {
            taxonomy_name: taxonomy.name().to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
        warnings,
    }
}

/// Build one extension's row. Errors exclude the extension, never the batch.
fn compare_extension(
    taxonomy: &Taxonomy,
    input: &ExtensionInput,
    index: usize,
    seen: &HashSet<String>,
) -> Result<(ExtensionComparisonRow, Vec<TableWarning>), ReconError> {
    let extension_id = input.extension_id.trim();
    if extension_id.is_empty() {
        let label = if input.name.trim().is_empty() {
            format!("#{index}")
        } else {
            input.name.trim().to_string()
        };
        return Err(ReconError::InvalidInput {
            extension_id: label,
            reason: "missing extension_id".into(),
        });
    }
    if seen.contains(extension_id) {
        return Err(ReconError::InvalidInput {
            extension_id: extension_id.to_string(),
            reason: "duplicate extension_id; first occurrence kept".into(),
        });
    }

    let policy_items: Vec<EvidenceItem> = input.policy.items.iter().map(EvidenceItem::from).collect();
    let disclosure_items: Vec<EvidenceItem> =
        input.disclosure.items.iter().map(EvidenceItem::from).collect();

    let policy = extract_categories(taxonomy, &policy_items);
    let mut disclosure = extract_categories(taxonomy, &disclosure_items);
    log::debug!(
        "{extension_id}: policy {:?} from {} item(s), disclosure {:?} from {} item(s)",
        policy,
        policy_items.len(),
        disclosure,
        disclosure_items.len(),
    );

    let mut notes = Vec::new();
    let mut warnings = Vec::new();
    for (source, failure) in [
        (SourceKind::Policy, &input.policy.failure),
        (SourceKind::Disclosure, &input.disclosure.failure),
    ] {
        if let Some(reason) = failure {
            log::warn!("{extension_id}: {source} extraction failed: {reason}");
            notes.push(format!("{source} not analyzed: {reason}"));
            warnings.push(TableWarning {
                extension_id: extension_id.to_string(),
                kind: WarningKind::UpstreamFailure,
                source: Some(source),
                reason: reason.clone(),
            });
        }
    }

    let mut disclosure_basis = DisclosureBasis::Evidence;
    if disclosure.is_empty() {
        if let Some(ref raw) = input.raw_disclosure {
            let labeled = taxonomy.store_label_categories(raw);
            if !labeled.is_empty() {
                log::debug!("{extension_id}: disclosure falls back to store labels {labeled:?}");
                disclosure = labeled;
                disclosure_basis = DisclosureBasis::StoreLabels;
                notes.push("disclosure categories taken from store labels".into());
            }
        }
    }

    let name = if input.name.trim().is_empty() {
        extension_id.to_string()
    } else {
        input.name.clone()
    };

    let row = ExtensionComparisonRow {
        extension_id: extension_id.to_string(),
        name,
        categories: reconcile(taxonomy, &policy, &disclosure),
        policy_analyzed: input.policy.failure.is_none(),
        disclosure_analyzed: input.disclosure.failure.is_none(),
        disclosure_basis,
        notes,
    };
    Ok((row, warnings))
}

// ---------------------------------------------------------------------------
// Batch loading
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchDoc {
    List(Vec<serde_json::Value>),
    Wrapped { extensions: Vec<serde_json::Value> },
}

/// Parse a batch document: a JSON array of extension inputs, or an object
/// with an `extensions` array.
///
/// Only a malformed document is an error. Individual entries that do not fit
/// the input shape come back as `Err` so the aggregator can exclude them.
pub fn load_batch_json(input: &str) -> Result<Vec<Result<ExtensionInput, ReconError>>, ReconError> {
    let doc: BatchDoc = serde_json::from_str(input).map_err(|e| {
        ReconError::InputParse(format!(
            "expected a JSON array of extensions or {{\"extensions\": [...]}}: {e}"
        ))
    })?;
    let values = match doc {
        BatchDoc::List(values) => values,
        BatchDoc::Wrapped { extensions } => extensions,
    };

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let label = value
                .get("extension_id")
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{index}"));
            serde_json::from_value::<ExtensionInput>(value).map_err(|e| ReconError::InvalidInput {
                extension_id: label,
                reason: format!("malformed input: {e}"),
            })
        })
        .collect())
}
