// src/lib.rs

//! Reconnaissance engine for a single domain: DNS records, HTTP/HTTPS probes,
//! security header analysis, technology fingerprinting and rate-limited
//! subdomain sweeps, gathered into one `ScanResult`.

pub mod core;
pub mod logging;

pub use crate::core::config::ReconConfig;
pub use crate::core::error::{LookupError, ProbeError, ReconError};
pub use crate::core::models::{
    DnsRecordSet, HeaderPresence, HeaderSet, HttpResults, ProbeResult, RecordOutcome, RecordType,
    ScanOptions, ScanResult, ScanTarget, SecurityHeaderReport, StageOutcome, SubdomainHit,
    TechnologySet,
};
pub use crate::core::scanner::dns_scanner::{DnsLookup, HickoryLookup};
pub use crate::core::scanner::http_prober::{HttpProbe, HttpProber, ProbeOptions};
pub use crate::core::scanner::{run_full_scan, Recon};
