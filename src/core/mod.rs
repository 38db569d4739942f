// src/core/mod.rs

// The `core` module holds the reconnaissance engine. The binary and any
// embedding application only talk to it through these sub-modules.

/// Data structures shared by every stage, such as `ScanResult`,
/// `DnsRecordSet` and `StageOutcome`.
pub mod models;

/// Error types for targets, probes and lookups.
pub mod error;

/// Engine configuration: rate limits, timeouts and the injectable tables.
pub mod config;

/// Static tables: security header names, technology signatures and the
/// default subdomain candidates.
pub mod knowledge_base;

/// The stage implementations and the orchestrator that sequences them.
pub mod scanner;
