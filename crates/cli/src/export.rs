//! Renderers for the comparison table: CSV, HTML and plain text.

use extaudit_recon::model::{Category, ComparisonState, ComparisonTable};

/// Column legend printed under the text table.
const LEGEND: &[(ComparisonState, &str)] = &[
    (ComparisonState::Neither, "Neither policy nor disclosure mentions this category"),
    (ComparisonState::DisclosureOnly, "Only the store disclosure mentions it (possible gap in the policy)"),
    (ComparisonState::PolicyOnly, "Only the privacy policy mentions it (possible gap in the disclosure)"),
    (ComparisonState::Both, "Both sources mention it (consistent)"),
];

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

/// Serialize the table as CSV, one row per extension.
pub fn to_csv(table: &ComparisonTable, categories: &[Category]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);

        let mut header = vec!["Extension".to_string(), "Extension ID".to_string()];
        header.extend(categories.iter().map(|c| c.display_name().to_string()));
        header.extend(["Policy Analyzed", "Disclosure Analyzed", "Notes"].map(String::from));
        wtr.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.name.clone(), row.extension_id.clone()];
            record.extend(categories.iter().map(|c| row.state(*c).to_string()));
            record.push(yes_no(row.policy_analyzed).into());
            record.push(yes_no(row.disclosure_analyzed).into());
            record.push(row.notes.join("; "));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn symbol(state: ComparisonState) -> &'static str {
    match state {
        ComparisonState::Neither => "-",
        ComparisonState::DisclosureOnly => "D",
        ComparisonState::PolicyOnly => "P",
        ComparisonState::Both => "D+P",
    }
}

/// Fixed-width text table with a legend.
pub fn to_text_table(table: &ComparisonTable, categories: &[Category], use_symbols: bool) -> String {
    const CAT_WIDTH: usize = 18;
    let name_width = table
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Extension".len())
        + 2;

    let mut header = format!("{:<name_width$}", "Extension");
    for c in categories {
        header.push('|');
        header.push_str(&format!("{:^CAT_WIDTH$}", c.display_name()));
    }
    let separator = "-".repeat(header.chars().count());

    let mut lines = vec![header, separator.clone()];
    for row in &table.rows {
        let mut line = format!("{:<name_width$}", row.name);
        for c in categories {
            let state = row.state(*c);
            let cell = if use_symbols {
                symbol(state).to_string()
            } else {
                state.to_string()
            };
            line.push('|');
            line.push_str(&format!("{cell:^CAT_WIDTH$}"));
        }
        lines.push(line);
    }
    lines.push(separator);

    lines.push(String::new());
    lines.push("Legend:".into());
    for (state, meaning) in LEGEND {
        let key = if use_symbols {
            symbol(*state).to_string()
        } else {
            state.to_string()
        };
        lines.push(format!("  {key:<16}= {meaning}"));
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn cell_color(state: ComparisonState) -> &'static str {
    match state {
        ComparisonState::Neither => "#f0f0f0",
        ComparisonState::DisclosureOnly => "#ffcccc",
        ComparisonState::PolicyOnly => "#ffffcc",
        ComparisonState::Both => "#ccffcc",
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone HTML page: colour-coded table plus legend.
pub fn to_html(table: &ComparisonTable, categories: &[Category]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Policy vs. Disclosure Comparison</title>\n<style>\n\
         body { font-family: sans-serif; margin: 20px; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: center; }\n\
         th { background-color: #4caf50; color: white; }\n\
         td.name { text-align: left; font-weight: bold; }\n",
    );
    for (state, _) in LEGEND {
        html.push_str(&format!(".{state} {{ background-color: {}; }}\n", cell_color(*state)));
    }
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!(
        "<h1>Policy vs. Disclosure Comparison</h1>\n<p>Taxonomy: {}</p>\n<table>\n<tr><th>Extension</th>",
        escape_html(&table.meta.taxonomy_name)
    ));
    for c in categories {
        html.push_str(&format!("<th>{}</th>", escape_html(c.display_name())));
    }
    html.push_str("</tr>\n");

    for row in &table.rows {
        html.push_str(&format!(
            "<tr><td class=\"name\" title=\"{}\">{}</td>",
            escape_html(&row.extension_id),
            escape_html(&row.name)
        ));
        for c in categories {
            let state = row.state(*c);
            html.push_str(&format!("<td class=\"{state}\">{state}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n<h2>Legend</h2>\n<ul>\n");
    for (state, meaning) in LEGEND {
        html.push_str(&format!("<li><span class=\"{state}\">{state}</span> {meaning}</li>\n"));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}
