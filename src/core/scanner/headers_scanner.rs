// src/core/scanner/headers_scanner.rs

use tracing::debug;

use crate::core::models::{HeaderPresence, HeaderSet, SecurityHeaderReport};

/// Checks for the presence of a specific header in a response header set.
fn check_header(headers: &HeaderSet, name: &str) -> HeaderPresence {
    match headers.get(name) {
        Some(value) => {
            debug!(header_name = name, value, "Header found.");
            HeaderPresence::Present(value.to_string())
        }
        None => {
            debug!(header_name = name, "Header not found.");
            HeaderPresence::NotPresent
        }
    }
}

/// Evaluates a response's headers against a fixed list of security header names.
///
/// Lookup is case-insensitive. Every name in `checked` gets exactly one entry
/// in the report; absent headers map to `HeaderPresence::NotPresent`, which is
/// distinct from a header that is present with an empty value.
///
/// # Arguments
/// * `checked` - The header names to look for.
/// * `headers` - The response headers.
///
/// # Returns
/// A `SecurityHeaderReport` keyed by the lowercased header name.
pub fn analyze_headers<S: AsRef<str>>(checked: &[S], headers: &HeaderSet) -> SecurityHeaderReport {
    let mut report = SecurityHeaderReport::default();
    for name in checked {
        let name = name.as_ref();
        report.insert(name, check_header(headers, name));
    }
    debug!(missing = report.missing().len(), "Security header analysis finished.");
    report
}
