// src/main.rs

use color_eyre::eyre::{bail, Result};
use tracing::info;

use vanguard_recon::logging::initialize_logging;
use vanguard_recon::{Recon, ReconConfig, ScanOptions};

/// Minimal driver: `vanguard-recon <domain> [--subdomains]`.
///
/// Prints the scan result as JSON on stdout; logs go to the data directory.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = initialize_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let enumerate_subdomains = args.iter().any(|a| a == "--subdomains");
    let Some(domain) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("usage: vanguard-recon <domain> [--subdomains]");
    };

    info!(log = %log_path.display(), %domain, "Driver started.");
    let recon = Recon::new(ReconConfig::from_env())?;
    let options = ScanOptions {
        enumerate_subdomains,
        wordlist: None,
    };
    let result = recon.scan(domain, &options).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
