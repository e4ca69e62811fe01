use std::collections::BTreeSet;

/// Parse a 1-based page selection like `1,3-5` into a sorted, deduplicated
/// list of 0-based page indices, validated against the document page count.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut selected = BTreeSet::new();

    for atom in input.split(',') {
        let atom = atom.trim();
        if atom.is_empty() {
            continue;
        }

        match atom.split_once('-') {
            Some((start, end)) => {
                let start = parse_page_number(start, page_count)?;
                let end = parse_page_number(end, page_count)?;
                selected.extend(start..=end);
            }
            None => {
                selected.insert(parse_page_number(atom, page_count)?);
            }
        }
    }

    Ok(selected.into_iter().map(|p| p - 1).collect())
}

fn parse_page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let page: usize = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", text.trim()))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}
