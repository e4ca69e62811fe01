use std::path::{Path, PathBuf};

use redactcheck::{ActionsSummary, AuditLog, clean};

use crate::cli::OutputFormat;
use crate::shared::read_file;

pub fn run(
    file: &Path,
    output: Option<&Path>,
    audit_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<(), i32> {
    let bytes = read_file(file)?;

    let audit = match audit_path {
        Some(path) => Some(load_audit(path)?),
        None => None,
    };

    let outcome = clean(&bytes, audit.as_ref()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(file),
    };
    std::fs::write(&out_path, &outcome.cleaned_bytes).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", out_path.display());
        1
    })?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&outcome.actions, &out_path)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.actions).map_err(|e| {
                eprintln!("Error: failed to encode summary: {e}");
                1
            })?;
            println!("{json}");
        }
    }
    Ok(())
}

fn load_audit(path: &Path) -> Result<AuditLog, i32> {
    let bytes = read_file(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        eprintln!("Error: {} is not a valid audit log: {e}", path.display());
        1
    })
}

/// `leaky.pdf` → `leaky.cleaned.pdf`, next to the input.
fn default_output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    file.with_file_name(format!("{stem}.cleaned.pdf"))
}

fn render_text(actions: &ActionsSummary, out_path: &Path) -> String {
    format!(
        "wrote {}\nremoved overlay ops:    {}\nannotation pages wiped: {}\nredact annots (audit):  {}\nnote: {}\n",
        out_path.display(),
        actions.removed_overlay_ops_estimate,
        actions.removed_annots_pages,
        actions.removed_redact_annots_estimate,
        actions.note,
    )
}
