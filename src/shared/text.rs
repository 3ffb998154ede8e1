/// Placeholder printed for absent values.
pub const EMPTY_VALUE: &str = "-";

/// Turns stored enum-like values and field keys into readable text:
/// `perpanjangan_slf` -> `perpanjangan slf`.
pub fn humanize(raw: &str) -> String {
    raw.trim().replace('_', " ")
}

/// Latitude/longitude pair with exactly six decimals.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{:.6}, {:.6}", latitude, longitude)
}

/// Returns the trimmed value or the `-` placeholder.
pub fn or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_VALUE)
        .to_string()
}
