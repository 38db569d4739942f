// src/core/scanner/dns_scanner.rs

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType as WireRecordType;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, info, warn};

use crate::core::error::LookupError;
use crate::core::models::{DnsRecordSet, RecordType};

/// The DNS operations the reconnaissance stages depend on.
///
/// Implementations perform exactly one query per call, with no retries.
pub trait DnsLookup {
    /// Looks up all records of one type for `name`, rendered as strings.
    fn lookup_records(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Result<Vec<String>, LookupError>> + Send;

    /// Resolves `name` to its IP addresses.
    fn lookup_addresses(&self, name: &str) -> impl Future<Output = Result<Vec<IpAddr>, LookupError>> + Send;
}

/// `DnsLookup` backed by hickory's Tokio resolver.
#[derive(Clone)]
pub struct HickoryLookup {
    resolver: TokioAsyncResolver,
}

impl HickoryLookup {
    /// Builds a resolver from the system configuration, falling back to the
    /// default upstream servers if the system configuration cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                warn!(error = %e, "Could not read system resolver config, using defaults.");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;
        Self::with_config(config, opts)
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl DnsLookup for HickoryLookup {
    async fn lookup_records(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, LookupError> {
        let wire_type = to_wire_type(record_type);
        let lookup = self.resolver.lookup(name, wire_type).await.map_err(classify)?;

        // Answers can carry CNAME chain records alongside the requested type.
        let records: Vec<String> = lookup
            .record_iter()
            .filter(|record| record.record_type() == wire_type)
            .filter_map(|record| record.data())
            .map(|data| data.to_string())
            .collect();

        if records.is_empty() {
            return Err(LookupError::NoRecords);
        }
        Ok(records)
    }

    async fn lookup_addresses(&self, name: &str) -> Result<Vec<IpAddr>, LookupError> {
        let lookup = self.resolver.lookup_ip(name).await.map_err(classify)?;
        let addresses: Vec<IpAddr> = lookup.iter().collect();
        if addresses.is_empty() {
            return Err(LookupError::NoRecords);
        }
        Ok(addresses)
    }
}

fn to_wire_type(record_type: RecordType) -> WireRecordType {
    match record_type {
        RecordType::A => WireRecordType::A,
        RecordType::AAAA => WireRecordType::AAAA,
        RecordType::MX => WireRecordType::MX,
        RecordType::TXT => WireRecordType::TXT,
        RecordType::NS => WireRecordType::NS,
        RecordType::CNAME => WireRecordType::CNAME,
    }
}

/// Maps a hickory error onto the lookup error taxonomy.
fn classify(error: ResolveError) -> LookupError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                LookupError::NxDomain
            } else {
                LookupError::NoRecords
            }
        }
        ResolveErrorKind::Timeout => LookupError::Timeout,
        ResolveErrorKind::NoConnections => LookupError::Unreachable(error.to_string()),
        _ => LookupError::Other(error.to_string()),
    }
}

/// Queries each requested record type for `name`, one at a time.
///
/// Each type is an independent query: a failure is recorded as an error marker
/// for that type alone and the remaining types are still queried. Successive
/// queries are separated by `delay`. The returned set holds exactly one entry
/// per distinct requested type.
///
/// # Arguments
/// * `resolver` - The lookup backend.
/// * `name` - The domain name to query.
/// * `record_types` - The types to query, in order.
/// * `delay` - Minimum pause between successive queries.
pub async fn resolve_records<R: DnsLookup>(
    resolver: &R,
    name: &str,
    record_types: &[RecordType],
    delay: Duration,
) -> DnsRecordSet {
    query_records(resolver, name, record_types, delay)
        .await
        .into_iter()
        .collect()
}

/// Same as [`resolve_records`], but keeps the typed error for each failed type.
pub async fn query_records<R: DnsLookup>(
    resolver: &R,
    name: &str,
    record_types: &[RecordType],
    delay: Duration,
) -> Vec<(RecordType, Result<Vec<String>, LookupError>)> {
    info!(target = %name, types = record_types.len(), "Starting DNS record lookups.");

    let mut distinct: Vec<RecordType> = Vec::with_capacity(record_types.len());
    for record_type in record_types {
        if !distinct.contains(record_type) {
            distinct.push(*record_type);
        }
    }

    let mut results = Vec::with_capacity(distinct.len());
    for (index, record_type) in distinct.into_iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        debug!(target = %name, %record_type, "Looking up records.");
        let result = resolver.lookup_records(name, record_type).await;
        match &result {
            Ok(values) => debug!(%record_type, count = values.len(), "Records found."),
            Err(e) => debug!(%record_type, error = %e, "Record lookup failed."),
        }
        results.push((record_type, result));
    }

    info!(target = %name, "DNS record lookups finished.");
    results
}

/// Resolves a name to its addresses.
///
/// Non-existent names and timeouts both come back as `Err`; callers that only
/// care about hits can treat every error as "no result".
pub async fn resolve_address<R: DnsLookup>(resolver: &R, name: &str) -> Result<Vec<IpAddr>, LookupError> {
    resolver.lookup_addresses(name).await
}
