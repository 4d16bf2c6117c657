use std::sync::OnceLock;

use regex::Regex;

/// Pulls the quoted filename out of a `Content-Disposition` header, e.g.
/// `attachment; filename="trucking_20240515.xlsx"`.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r#"filename="([^"]+)""#).expect("valid regex"));
    pattern
        .captures(header)
        .map(|captures| captures[1].to_string())
}

/// Fallback name when the server does not say: `companies_<date>.xlsx`.
pub fn default_export_filename(date: &str) -> String {
    format!("companies_{date}.xlsx")
}
