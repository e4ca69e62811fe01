use std::path::Path;

use redactcheck::{AuditLog, Risk, analyze};

use crate::cli::OutputFormat;
use crate::shared::{file_name_of, read_file, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    output: Option<&Path>,
) -> Result<(), i32> {
    let bytes = read_file(file)?;

    let mut audit = analyze(&bytes, &file_name_of(file)).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    if let Some(range) = pages {
        let page_count = audit.source.page_count;
        restrict_to_pages(&mut audit, &resolve_pages(Some(range), page_count)?);
    }

    let rendered = match format {
        OutputFormat::Text => render_text(&audit),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&audit).map_err(|e| {
                eprintln!("Error: failed to encode audit: {e}");
                1
            })?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => std::fs::write(path, rendered.as_bytes()).map_err(|e| {
            eprintln!("Error: failed to write {}: {e}", path.display());
            1
        }),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Keep only the selected pages (0-based indices) and recount the summary.
fn restrict_to_pages(audit: &mut AuditLog, selected: &[usize]) {
    audit.pages.retain(|p| selected.contains(&(p.page - 1)));
    audit.summary.pages_flagged = audit
        .pages
        .iter()
        .filter(|p| p.risk == Risk::Flagged)
        .count();
}

fn render_text(audit: &AuditLog) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({} bytes, {} pages)\nsha256 {}\n\n",
        audit.source.file_name,
        audit.source.file_size_bytes,
        audit.source.page_count,
        audit.source.sha256,
    ));
    out.push_str("page\trisk\tconf\ttext\trects\tannots\toverlap\n");
    for page in &audit.pages {
        let risk = match page.risk {
            Risk::Flagged => "flagged",
            Risk::None => "none",
        };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            page.page,
            risk,
            page.confidence,
            page.signals.text_chars,
            page.signals.dark_rects,
            page.signals.redact_annots,
            if page.signals.overlaps_text_likely {
                "yes"
            } else {
                "no"
            },
        ));
    }
    out.push_str(&format!(
        "\n{} of {} analyzed page(s) flagged\n",
        audit.summary.pages_flagged,
        audit.pages.len(),
    ));
    out
}
