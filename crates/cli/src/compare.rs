//! `extaudit run|validate|categorize|taxonomy`: taxonomy-driven comparison.

use std::path::{Path, PathBuf};

use extaudit_recon::model::Category;
use extaudit_recon::{aggregate_parsed, load_batch_json, ReconConfig, Taxonomy};

use crate::exit_codes::{EXIT_DISCREPANCY, EXIT_ERROR, EXIT_INPUT, EXIT_INVALID_TAXONOMY, EXIT_OUTPUT, EXIT_USAGE};
use crate::export::{to_csv, to_html, to_text_table};
use crate::CliError;

fn cli_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Read and compile a taxonomy file, or the built-in one when none is given.
fn load_taxonomy(path: Option<&Path>) -> Result<Taxonomy, CliError> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                cli_err(EXIT_INPUT, format!("cannot read taxonomy {}: {e}", path.display()))
            })?;
            ReconConfig::from_toml(&text)
        }
        None => ReconConfig::default_taxonomy(),
    }
    .map_err(|e| {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        CliError {
            code: EXIT_INVALID_TAXONOMY,
            message: e.to_string(),
            hint: Some(format!("every category ({}) needs at least one pattern", keys.join(", "))),
        }
    })?;

    Taxonomy::compile(&config).map_err(|e| cli_err(EXIT_INVALID_TAXONOMY, e.to_string()))
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_run(
    input: PathBuf,
    taxonomy: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
    html_file: Option<PathBuf>,
    symbols: bool,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let taxonomy = load_taxonomy(taxonomy.as_deref())?;

    let doc = std::fs::read_to_string(&input)
        .map_err(|e| cli_err(EXIT_INPUT, format!("cannot read {}: {e}", input.display())))?;
    let entries = load_batch_json(&doc).map_err(|e| cli_err(EXIT_INPUT, e.to_string()))?;
    log::debug!("loaded {} extension(s) from {}", entries.len(), input.display());

    let table = aggregate_parsed(&taxonomy, &entries);
    let categories: Vec<Category> = taxonomy.categories().collect();

    // Output
    let json_str = serde_json::to_string_pretty(&table)
        .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| cli_err(EXIT_OUTPUT, format!("cannot write output: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = csv_file {
        let csv = to_csv(&table, &categories)
            .map_err(|e| cli_err(EXIT_ERROR, format!("CSV serialization error: {e}")))?;
        std::fs::write(path, csv)
            .map_err(|e| cli_err(EXIT_OUTPUT, format!("cannot write CSV: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = html_file {
        std::fs::write(path, to_html(&table, &categories))
            .map_err(|e| cli_err(EXIT_OUTPUT, format!("cannot write HTML: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    if !quiet {
        if !table.rows.is_empty() {
            eprintln!("{}", to_text_table(&table, &categories, symbols));
            eprintln!();
        }
        for w in &table.warnings {
            match w.source {
                Some(source) => eprintln!("warning: {} ({source}): {}", w.extension_id, w.reason),
                None => eprintln!("warning: {}: {}", w.extension_id, w.reason),
            }
        }
        let s = &table.summary;
        eprintln!(
            "compared {} extension(s) with taxonomy '{}': {} with discrepancies, {} excluded, {} upstream failure(s)",
            s.extensions, table.meta.taxonomy_name, s.with_discrepancies, s.excluded, s.upstream_failures,
        );
    }

    if strict && table.summary.with_discrepancies > 0 {
        return Err(cli_err(EXIT_DISCREPANCY, "discrepancies found"));
    }

    Ok(())
}

pub fn cmd_validate(taxonomy: PathBuf) -> Result<(), CliError> {
    let taxonomy = load_taxonomy(Some(taxonomy.as_path()))?;
    let counts: Vec<String> = taxonomy
        .categories()
        .map(|c| format!("{c}={}", taxonomy.patterns(c).len()))
        .collect();
    eprintln!(
        "valid: taxonomy '{}' ({} match) with {} categor(ies): {}",
        taxonomy.name(),
        taxonomy.match_mode(),
        counts.len(),
        counts.join(", "),
    );
    Ok(())
}

pub fn cmd_categorize(text: String, taxonomy: Option<PathBuf>, json_output: bool) -> Result<(), CliError> {
    if text.trim().is_empty() {
        return Err(cli_err(EXIT_USAGE, "text must not be empty"));
    }
    let taxonomy = load_taxonomy(taxonomy.as_deref())?;
    let detail = taxonomy.matches_detail(&text);

    if json_output {
        let json_str = serde_json::to_string_pretty(&detail)
            .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    if detail.is_empty() {
        println!("(no category)");
    }
    for (category, patterns) in &detail {
        println!("{category}: {}", patterns.join(", "));
    }
    Ok(())
}

pub fn cmd_taxonomy(taxonomy: Option<PathBuf>) -> Result<(), CliError> {
    let taxonomy = load_taxonomy(taxonomy.as_deref())?;
    println!("name = {:?}", taxonomy.name());
    println!("match_mode = {:?}", taxonomy.match_mode().to_string());
    for c in taxonomy.categories() {
        println!();
        println!("[categories.{c}]  # {}", c.display_name());
        for p in taxonomy.patterns(c) {
            println!("  {p}");
        }
    }
    Ok(())
}
