// src/core/error.rs

use thiserror::Error;

/// Errors that abort a reconnaissance run or the construction of its engine.
///
/// Per-probe and per-lookup failures never show up here; they are folded into
/// the `ScanResult` as absent or failed stage outcomes.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("invalid scan target: {0}")]
    InvalidTarget(String),
    #[error("invalid signature pattern for '{label}': {source}")]
    InvalidSignature {
        label: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure of a single HTTP(S) probe.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Failure of a single DNS query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("name does not exist")]
    NxDomain,
    #[error("no records of the requested type")]
    NoRecords,
    #[error("query timed out")]
    Timeout,
    #[error("resolver unreachable: {0}")]
    Unreachable(String),
    #[error("lookup failed: {0}")]
    Other(String),
}

impl LookupError {
    /// True when the failure says something about the resolver path rather
    /// than about the queried name.
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Timeout | LookupError::Unreachable(_))
    }
}
