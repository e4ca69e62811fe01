use std::path::Path;

use crate::page_range::parse_page_range;

/// Read a file with user-friendly error messages.
///
/// Returns `Err(1)` with a message on stderr if the file is missing or
/// unreadable.
pub fn read_file(path: &Path) -> Result<Vec<u8>, i32> {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        return Err(1);
    }
    std::fs::read(path).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", path.display());
        1
    })
}

/// The file name component of a path, for audit source records.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve an optional page selection into 0-based indices.
///
/// `None` selects every page. Invalid selections exit with code 2.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            2
        }),
        None => Ok((0..page_count).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_file_not_found() {
        let result = read_file(Path::new("/nonexistent/input.pdf"));
        assert_eq!(result.unwrap_err(), 1);
    }

    #[test]
    fn file_name_of_plain_path() {
        assert_eq!(file_name_of(Path::new("/tmp/docs/leak.pdf")), "leak.pdf");
    }

    #[test]
    fn resolve_pages_none_selects_all() {
        assert_eq!(resolve_pages(None, 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn resolve_pages_with_selection() {
        assert_eq!(resolve_pages(Some("1,3"), 3).unwrap(), vec![0, 2]);
    }

    #[test]
    fn resolve_pages_bad_selection_exits_2() {
        assert_eq!(resolve_pages(Some("0"), 3).unwrap_err(), 2);
    }
}
