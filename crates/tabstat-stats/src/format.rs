//! Fixed-point number rendering for summaries.

/// Renders `value` with exactly `digits` decimals.
///
/// The exact binary value is rounded half-to-even, so `1.005` (stored just
/// below the tie) renders as `1.00`. A result that rounds to zero never
/// carries a minus sign.
pub fn format_fixed(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$}");
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => text,
    }
}

/// Confidence level as a percentage label: `0.95` gives `95`, `0.999`
/// gives `99.9`.
pub fn format_percent_label(level: f64) -> String {
    let text = format!("{:.6}", level * 100.0);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
