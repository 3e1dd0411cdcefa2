pub(crate) const DEFAULT_DATABASE: &str = "<default>";

pub(crate) fn format_float(v: f64) -> String {
    format!("{v:.3}")
}

pub(crate) fn format_count(v: u64) -> String {
    format!("{:.3}", v as f64)
}

/// Fraction in `[0, 1]` as a percentage with two decimals.
pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{:.2}", fraction * 100.0)
}

/// Quotes a tabular string cell, doubling embedded quotes.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub(crate) fn display_database(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_DATABASE
    } else {
        name
    }
}
