use std::time::Duration;

use clap::Parser;
use mailauth_lib::{DohOptions, ReportOptions};

#[derive(Parser)]
#[command(name = "mailauth-cli", version, about = "MX, SPF, DMARC and DKIM report for email domains")]
pub struct Cli {
    /// domains to check
    pub domains: Vec<String>,

    /// read domains from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// DKIM selector to probe (e.g. `google`, `s1`)
    #[arg(long = "dkim-selector")]
    pub dkim_selector: Option<String>,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long = "doh-endpoint")]
    pub doh_endpoint: Option<String>,

    /// per-query timeout (ms)
    #[arg(long = "timeout-ms", default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// time budget for expanding SPF includes (ms)
    #[arg(long = "spf-budget-ms", default_value_t = 10_000)]
    pub spf_budget_ms: u64,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// write report to file (JSON/NDJSON/CSV per --format)
    #[arg(long)]
    pub out: Option<String>,

    /// query the system resolver instead of DNS-over-HTTPS
    #[cfg(feature = "with-system-dns")]
    #[arg(long = "system-dns")]
    pub system_dns: bool,

    /// debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn doh_options(&self) -> DohOptions {
        let mut options = DohOptions::new().with_timeout(self.query_timeout());
        if let Some(endpoint) = &self.doh_endpoint {
            options = options.with_endpoint(endpoint.as_str());
        }
        options
    }

    pub fn report_options(&self) -> ReportOptions {
        let mut options =
            ReportOptions::new().with_spf_budget(Duration::from_millis(self.spf_budget_ms));
        if let Some(selector) = &self.dkim_selector {
            options = options.with_dkim_selector(selector.as_str());
        }
        options
    }
}
