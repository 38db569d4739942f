// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use url::Url;

use crate::core::error::{LookupError, ReconError};

// --- Stage Outcomes ---

/// The outcome of one stage (or one probe) of a reconnaissance run.
///
/// Every stage reports through this union instead of propagating an error, so a
/// `ScanResult` can always be returned no matter how many stages went wrong.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    Success(T),
    Skipped,
    Failed(String),
}

impl<T> StageOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            StageOutcome::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> Default for StageOutcome<T> {
    fn default() -> Self {
        StageOutcome::Skipped
    }
}

// --- Scan Target ---

/// A validated, normalized domain name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ScanTarget(String);

impl ScanTarget {
    const MAX_NAME_LEN: usize = 253;
    const MAX_LABEL_LEN: usize = 63;

    /// Parses user input into a target domain.
    ///
    /// Accepts either a bare host (`example.com`) or a URL
    /// (`https://example.com/path`), in which case only the host is kept.
    /// The result is lowercased and stripped of a trailing root dot.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReconError::InvalidTarget("target is empty".to_string()));
        }

        let host = if trimmed.contains("://") {
            Url::parse(trimmed)
                .ok()
                .and_then(|url| url.host_str().map(str::to_string))
                .ok_or_else(|| ReconError::InvalidTarget(format!("'{trimmed}' has no host")))?
        } else {
            trimmed.to_string()
        };

        let name = host.trim_end_matches('.').to_ascii_lowercase();
        if name.is_empty() {
            return Err(ReconError::InvalidTarget("target is empty".to_string()));
        }
        if name.len() > Self::MAX_NAME_LEN {
            return Err(ReconError::InvalidTarget(format!(
                "'{name}' is longer than {} characters",
                Self::MAX_NAME_LEN
            )));
        }
        for label in name.split('.') {
            if label.is_empty() {
                return Err(ReconError::InvalidTarget(format!("'{name}' contains an empty label")));
            }
            if label.len() > Self::MAX_LABEL_LEN {
                return Err(ReconError::InvalidTarget(format!(
                    "label '{label}' is longer than {} characters",
                    Self::MAX_LABEL_LEN
                )));
            }
            if let Some(bad) = label
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
            {
                return Err(ReconError::InvalidTarget(format!(
                    "'{name}' contains invalid character '{bad}'"
                )));
            }
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- DNS Models ---

/// The DNS record types the resolver stage knows how to query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    A,
    AAAA,
    MX,
    TXT,
    NS,
    CNAME,
}

impl RecordType {
    /// All supported types in their canonical query order.
    pub fn all() -> Vec<RecordType> {
        RecordType::iter().collect()
    }
}

// The per-type result of a record lookup: either the values or an error marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Records(Vec<String>),
    Error(String),
}

/// Exactly one `RecordOutcome` per requested record type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DnsRecordSet(BTreeMap<RecordType, RecordOutcome>);

impl DnsRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record_type: RecordType, outcome: RecordOutcome) {
        self.0.insert(record_type, outcome);
    }

    pub fn get(&self, record_type: RecordType) -> Option<&RecordOutcome> {
        self.0.get(&record_type)
    }

    /// Values for a type, or `None` if the type is missing or errored.
    pub fn records(&self, record_type: RecordType) -> Option<&[String]> {
        match self.0.get(&record_type) {
            Some(RecordOutcome::Records(values)) => Some(values),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordType, &RecordOutcome)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RecordType, Result<Vec<String>, LookupError>)> for DnsRecordSet {
    fn from_iter<I: IntoIterator<Item = (RecordType, Result<Vec<String>, LookupError>)>>(iter: I) -> Self {
        let mut records = DnsRecordSet::new();
        for (record_type, result) in iter {
            let outcome = match result {
                Ok(values) => RecordOutcome::Records(values),
                Err(e) => RecordOutcome::Error(e.to_string()),
            };
            records.insert(record_type, outcome);
        }
        records
    }
}

// --- HTTP Models ---

/// A header mapping with case-insensitive keys (stored lowercased).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value under the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Appends a value, joining repeated headers with ", ".
    pub fn append(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderSet::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// A single captured HTTP(S) response. Never modified after the prober returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: Option<u16>,
    pub headers: HeaderSet,
    #[serde(skip)]
    pub body: String,
    pub url: String,
}

// Both probes of the HTTP stage. Either scheme may fail independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpResults {
    pub http: StageOutcome<ProbeResult>,
    pub https: StageOutcome<ProbeResult>,
}

impl HttpResults {
    /// The response later stages analyze: HTTPS if it succeeded, else HTTP.
    pub fn primary(&self) -> Option<&ProbeResult> {
        self.https.success().or_else(|| self.http.success())
    }

    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }
}

// --- Header Analysis Models ---

/// Observed state of one security header. `NotPresent` is distinct from a
/// header that is present with an empty value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPresence {
    Present(String),
    NotPresent,
}

impl HeaderPresence {
    pub fn value(&self) -> Option<&str> {
        match self {
            HeaderPresence::Present(v) => Some(v),
            HeaderPresence::NotPresent => None,
        }
    }
}

impl fmt::Display for HeaderPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderPresence::Present(v) => f.write_str(v),
            HeaderPresence::NotPresent => f.write_str("Not Present"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecurityHeaderReport(BTreeMap<String, HeaderPresence>);

impl SecurityHeaderReport {
    pub fn insert(&mut self, name: &str, presence: HeaderPresence) {
        self.0.insert(name.to_ascii_lowercase(), presence);
    }

    pub fn get(&self, name: &str) -> Option<&HeaderPresence> {
        self.0.get(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderPresence)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the checked headers that were not in the response.
    pub fn missing(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, presence)| **presence == HeaderPresence::NotPresent)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// --- Fingerprint Models ---

/// Deduplicated, unordered set of detected technology labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TechnologySet(BTreeSet<String>);

impl TechnologySet {
    pub fn insert(&mut self, label: &str) -> bool {
        self.0.insert(label.to_string())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// --- Subdomain Models ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubdomainHit {
    pub subdomain: String,
    pub ip: IpAddr,
}

// --- Main Report ---

/// Caller options for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub enumerate_subdomains: bool,
    /// Candidate labels in sweep order. `None` uses the built-in list.
    pub wordlist: Option<Vec<String>>,
}

/// The aggregate result of one reconnaissance run, owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub domain: ScanTarget,
    pub timestamp: DateTime<Utc>,
    pub dns: StageOutcome<DnsRecordSet>,
    pub http: HttpResults,
    pub security: StageOutcome<SecurityHeaderReport>,
    pub technologies: StageOutcome<TechnologySet>,
    pub subdomains: StageOutcome<Vec<SubdomainHit>>,
}

impl ScanResult {
    pub fn new(domain: ScanTarget) -> Self {
        Self {
            domain,
            timestamp: Utc::now(),
            dns: StageOutcome::Skipped,
            http: HttpResults::default(),
            security: StageOutcome::Skipped,
            technologies: StageOutcome::Skipped,
            subdomains: StageOutcome::Skipped,
        }
    }
}
