//! Header repair: every column gets a non-empty, unique name.

use std::collections::HashSet;

/// Repairs raw header cells so they can name table columns.
///
/// Blank cells become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
/// appended in order of appearance.
pub fn repair_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for (index, cell) in raw.into_iter().enumerate() {
        let base = if cell.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            cell
        };
        let mut candidate = base.clone();
        let mut suffix = 0usize;
        while used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }

    names
}
