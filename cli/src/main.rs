//! la-ingest CLI
//!
//! Writes a valid JSON document to Azure Log Analytics through the HTTP Data
//! Collector API, signing the request with the workspace shared key.
//!
//! # Usage
//!
//! ```bash
//! la-ingest --help
//! la-ingest -w <workspace-id> -l MyRecords -k <shared-key> records.json
//! cat records.json | la-ingest --debug
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use shared::config::{
    IngestionEndpoint, DEFAULT_INGESTION_DOMAIN, ENV_ENDPOINT, ENV_INGESTION_DOMAIN,
    ENV_LOG_TYPE, ENV_SHARED_KEY, ENV_WORKSPACE_ID,
};
use shared::input::{load_payload, InputSource};
use shared::models::Credentials;
use shared::publisher::{PublishOutcome, Publisher, PublisherConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// A little tool that writes valid JSON to Log Analytics via REST API calls
#[derive(Parser)]
#[command(name = "la-ingest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file to ingest; standard input is read when omitted
    ingestion_file: Option<PathBuf>,

    /// Log Analytics workspace ID
    #[arg(short, long, env = ENV_WORKSPACE_ID, alias = "workspace_id")]
    workspace_id: String,

    /// Log type the records will be ingested as
    #[arg(short, long, env = ENV_LOG_TYPE)]
    logtype: String,

    /// Log Analytics shared key
    #[arg(short, long, env = ENV_SHARED_KEY, hide_env_values = true)]
    key: String,

    /// Turn on HTTP tracing
    #[arg(short, long)]
    debug: bool,

    /// Ingestion host suffix (sovereign clouds use a different one)
    #[arg(long, env = ENV_INGESTION_DOMAIN, default_value = DEFAULT_INGESTION_DOMAIN)]
    ingestion_domain: String,

    /// Send to this base URL instead of the workspace host
    #[arg(long, env = ENV_ENDPOINT, hide = true)]
    endpoint: Option<String>,
}

impl Cli {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.workspace_id, &self.key, &self.logtype)
    }

    fn publisher_config(&self) -> PublisherConfig {
        let mut endpoint = IngestionEndpoint::new(&self.ingestion_domain);
        if let Some(base_url) = &self.endpoint {
            endpoint = endpoint.with_base_url(base_url);
        }
        PublisherConfig::default()
            .with_endpoint(endpoint)
            .with_verbose(self.debug)
    }

    fn source(&self) -> InputSource {
        InputSource::from_optional_path(self.ingestion_file.clone())
    }
}

/// Directives `--debug` adds on top of `RUST_LOG` or the default filter.
const DEBUG_DIRECTIVES: [&str; 4] = [
    "shared=debug",
    "la_ingest=debug",
    "reqwest=trace",
    "hyper_util=debug",
];

fn build_filter(debug: bool) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if debug {
        for directive in DEBUG_DIRECTIVES {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

fn init_tracing(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<PublishOutcome> {
    let credentials = cli.credentials();
    credentials
        .validate_credentials()
        .context("Invalid workspace credentials")?;

    let source = cli.source();
    tracing::debug!(%source, workspace_id = %credentials.workspace_id, "Reading input");
    let payload = load_payload(&source).with_context(|| format!("Failed to load {source}"))?;

    println!("{}", payload.body());

    let publisher =
        Publisher::new(cli.publisher_config()).context("Failed to create HTTP client")?;
    let outcome = publisher
        .publish(&credentials, &payload)
        .await
        .context("Failed to send payload to Log Analytics")?;

    println!("{outcome}");
    Ok(outcome)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    run(cli).await?;
    Ok(())
}
