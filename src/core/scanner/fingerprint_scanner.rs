// src/core/scanner/fingerprint_scanner.rs

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::core::error::ReconError;
use crate::core::knowledge_base::TECHNOLOGY_SIGNATURES;
use crate::core::models::{HeaderSet, TechnologySet};

/// A rule that infers the presence of a technology from response signals.
#[derive(Debug, Clone)]
pub struct Signature {
    /// The name of the technology (e.g., "Nginx").
    pub label: String,
    /// Case-insensitive pattern matched against each signal source.
    pub pattern: Regex,
}

/// An ordered table of signatures. Evaluation order never affects the result.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    signatures: Vec<Signature>,
}

// The built-in table is compiled once and cloned into each config.
static BUILTIN: Lazy<SignatureTable> = Lazy::new(|| {
    SignatureTable::from_pairs(TECHNOLOGY_SIGNATURES)
        .expect("built-in technology signatures must compile")
});

impl SignatureTable {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Compiles a table from `(label, pattern)` pairs.
    pub fn from_pairs<L, P>(pairs: &[(L, P)]) -> Result<Self, ReconError>
    where
        L: AsRef<str>,
        P: AsRef<str>,
    {
        let signatures = pairs
            .iter()
            .map(|(label, pattern)| {
                RegexBuilder::new(pattern.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map(|pattern| Signature {
                        label: label.as_ref().to_string(),
                        pattern,
                    })
                    .map_err(|source| ReconError::InvalidSignature {
                        label: label.as_ref().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { signatures })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Detects technologies from a response's headers and body.
///
/// Each signature is tested against three sources: the `Server` header, the
/// `X-Powered-By` header and the full body. A match in any one of them is
/// enough. Missing headers or an empty body simply match nothing.
///
/// # Arguments
/// * `signatures` - The table to evaluate.
/// * `headers` - The response headers.
/// * `body` - The response body.
///
/// # Returns
/// The deduplicated set of matched labels.
pub fn detect_technologies(signatures: &SignatureTable, headers: &HeaderSet, body: &str) -> TechnologySet {
    let server = headers.get("server").unwrap_or_default();
    let powered_by = headers.get("x-powered-by").unwrap_or_default();

    let mut found = TechnologySet::default();
    for signature in signatures.iter() {
        let matched = [server, powered_by, body]
            .iter()
            .any(|source| !source.is_empty() && signature.pattern.is_match(source));
        if matched && found.insert(&signature.label) {
            debug!(tech = %signature.label, "Signature matched.");
        }
    }

    debug!(count = found.len(), "Fingerprinting finished.");
    found
}
