mod args;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use futures::StreamExt;
use mailauth_lib::{DnsQuery, DohClient, DomainName, ReportOptions, build_report};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::output::{OutputRow, any_invalid, write_reports};

/// Domains checked at the same time; each report already runs its lookups concurrently.
const CONCURRENT_DOMAINS: usize = 4;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut inputs = cli.domains.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                inputs.push(line.to_string());
            }
        }
    }
    if inputs.is_empty() {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let client = make_client(&cli)?;
    let options = cli.report_options();
    let rows = check_all(client.as_ref(), &inputs, &options).await;

    write_reports(&rows, &cli)?;

    // exit codes: 0 OK, 2 invalid input, 1 fatal
    if any_invalid(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn make_client(cli: &Cli) -> Result<Box<dyn DnsQuery>> {
    #[cfg(feature = "with-system-dns")]
    if cli.system_dns {
        let resolver = mailauth_lib::SystemResolver::from_system_conf()
            .context("load system resolver configuration")?
            .with_timeout(cli.query_timeout());
        return Ok(Box::new(resolver));
    }

    let client = DohClient::with_options(cli.doh_options()).context("build DoH client")?;
    Ok(Box::new(client))
}

async fn check_all(
    client: &dyn DnsQuery,
    inputs: &[String],
    options: &ReportOptions,
) -> Vec<OutputRow> {
    futures::stream::iter(inputs)
        .map(|input| check_one(client, input, options))
        .buffered(CONCURRENT_DOMAINS)
        .collect()
        .await
}

async fn check_one(client: &dyn DnsQuery, input: &str, options: &ReportOptions) -> OutputRow {
    match DomainName::parse(input) {
        Ok(domain) => OutputRow::report(input, build_report(client, &domain, options).await),
        Err(err) => OutputRow::invalid(input, err.to_string()),
    }
}
