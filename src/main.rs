//! Runs one coverage round against the magazine store and prints the service's verdict.

// std
use std::{io, time::Duration};
// crates.io
use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
// self
use magazine_coverage::{
	client::StoreClient,
	descriptor::{DEFAULT_BASE_URL, StoreDescriptor},
};

/// Finds the subscribers covering every magazine category and reports them to the store.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Base URL every endpoint path is appended to.
	#[arg(long, env = "MAGAZINE_STORE_URL", default_value = DEFAULT_BASE_URL)]
	base_url: Url,
	/// Deadline, in seconds, applied to every network call.
	#[arg(long, env = "MAGAZINE_STORE_TIMEOUT_SECS", default_value_t = 30)]
	timeout_secs: u64,
	/// Compute and print the qualifying subscriber ids without submitting them.
	#[arg(long)]
	dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	fmt().with_env_filter(filter).with_writer(io::stderr).init();

	let cli = Cli::parse();
	let descriptor = StoreDescriptor::builder()
		.base_url(cli.base_url)
		.timeout(Duration::from_secs(cli.timeout_secs))
		.build()?;
	let client = StoreClient::new(descriptor)?;

	if cli.dry_run {
		let report = client.compute_coverage().await.wrap_err("Coverage run failed")?;

		println!("{}", serde_json::to_string(&report.result.to_sorted_vec())?);
	} else {
		let report = client.run().await.wrap_err("Coverage run failed")?;

		println!("{}", serde_json::to_string(&report.verdict)?);
	}

	Ok(())
}
