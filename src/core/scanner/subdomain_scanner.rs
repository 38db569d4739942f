// src/core/scanner/subdomain_scanner.rs

use std::time::Duration;
use tracing::{debug, info};

use super::dns_scanner::{resolve_address, DnsLookup};
use crate::core::models::SubdomainHit;

/// Sweeps candidate labels under `domain` and collects the ones that resolve.
///
/// Candidates are tried strictly one after another, in the order given, with
/// `delay` between successive attempts whether or not the previous one
/// resolved. This keeps the outbound query rate at or below one per `delay`.
/// A candidate that fails to resolve, for any reason, leaves no trace in the
/// output. Blank labels are skipped without a query.
///
/// # Arguments
/// * `resolver` - The lookup backend.
/// * `domain` - The parent domain.
/// * `candidates` - Labels to try, already loaded by the caller.
/// * `delay` - Minimum pause between successive attempts.
///
/// # Returns
/// One `SubdomainHit` per resolving candidate, in candidate order, each
/// carrying the first returned address.
pub async fn sweep_subdomains<R, S>(
    resolver: &R,
    domain: &str,
    candidates: &[S],
    delay: Duration,
) -> Vec<SubdomainHit>
where
    R: DnsLookup,
    S: AsRef<str>,
{
    info!(target = %domain, candidates = candidates.len(), "Starting subdomain sweep.");

    let mut hits = Vec::new();
    let mut attempts = 0usize;
    for candidate in candidates {
        let label = candidate.as_ref().trim().trim_matches('.');
        if label.is_empty() {
            continue;
        }

        if attempts > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        attempts += 1;

        let name = format!("{label}.{domain}");
        match resolve_address(resolver, &name).await {
            Ok(addresses) => {
                if let Some(ip) = addresses.first() {
                    info!(subdomain = %name, %ip, "Found subdomain.");
                    hits.push(SubdomainHit {
                        subdomain: name,
                        ip: *ip,
                    });
                }
            }
            Err(e) => debug!(subdomain = %name, error = %e, "Candidate did not resolve."),
        }
    }

    info!(target = %domain, attempts, found = hits.len(), "Subdomain sweep finished.");
    hits
}
