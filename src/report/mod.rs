//! Email authentication report orchestration.
//!
//! [`build_report`] asks the four independent questions (MX, root TXT for SPF,
//! `_dmarc` TXT, and optionally the DKIM selector) concurrently and waits for
//! all of them. A failed branch is recorded in that branch only; the report is
//! always assembled.

mod advice;
mod error;
mod options;
mod types;

pub use error::ReportError;
pub use options::ReportOptions;
pub use types::{
    DiagnosticCommands, DmarcReport, EmailAuthReport, MxReport, RecordReport, SpfReport,
};

use tokio::time::Instant;
use tracing::{info, warn};

use crate::auth::{is_dmarc_record, is_spf_record, probe_dkim, validate_dmarc, validate_spf};
use crate::dns::{DnsQuery, DohClient, RecordType, decode_mx, decode_txt};
use crate::domain::DomainName;
use crate::mx::enrich_all;

/// Validates `domain`, then reports on it through a default [`DohClient`].
pub async fn resolve_email_authentication(
    domain: &str,
    dkim_selector: Option<&str>,
) -> Result<EmailAuthReport, ReportError> {
    let domain = DomainName::parse(domain)?;
    let client = DohClient::new()?;
    let mut options = ReportOptions::new();
    if let Some(selector) = dkim_selector {
        options = options.with_dkim_selector(selector);
    }
    Ok(build_report(&client, &domain, &options).await)
}

pub async fn build_report<C>(
    client: &C,
    domain: &DomainName,
    options: &ReportOptions,
) -> EmailAuthReport
where
    C: DnsQuery + ?Sized,
{
    let dkim = async {
        match options.dkim_selector() {
            Some(selector) => Some(probe_dkim(client, selector, domain).await),
            None => None,
        }
    };

    let (mx, spf, dmarc, dkim) = tokio::join!(
        mx_branch(client, domain),
        spf_branch(client, domain, options),
        dmarc_branch(client, domain),
        dkim,
    );

    let recommendations = advice::recommendations(domain, &mx, &spf, &dmarc, dkim.as_ref());
    let diagnostic_commands = advice::diagnostic_commands(&mx);

    info!(
        %domain,
        mx = mx.status.as_str(),
        spf = spf.status.as_str(),
        dmarc = dmarc.status.as_str(),
        dkim = dkim.as_ref().map(|result| result.status.as_str()),
        "email authentication report built"
    );

    EmailAuthReport {
        domain: domain.clone(),
        mx,
        spf,
        dmarc,
        dkim,
        recommendations,
        diagnostic_commands,
    }
}

async fn mx_branch<C>(client: &C, domain: &DomainName) -> MxReport
where
    C: DnsQuery + ?Sized,
{
    let answers = match client.query(domain.as_str(), RecordType::Mx).await {
        Ok(answers) => answers,
        Err(err) => {
            warn!(%domain, error = %err, "MX branch failed");
            return MxReport::error(format!("MX lookup failed: {err}"));
        }
    };
    let records = decode_mx(&answers);
    if records.is_empty() {
        return MxReport::not_found();
    }
    MxReport::success(enrich_all(client, records).await)
}

async fn spf_branch<C>(client: &C, domain: &DomainName, options: &ReportOptions) -> SpfReport
where
    C: DnsQuery + ?Sized,
{
    let deadline = Instant::now() + options.spf_budget();
    let answers = match client.query(domain.as_str(), RecordType::Txt).await {
        Ok(answers) => answers,
        Err(err) => {
            warn!(%domain, error = %err, "SPF branch failed");
            return SpfReport::error(format!("TXT lookup failed: {err}"));
        }
    };
    let Some(record) = decode_txt(&answers)
        .into_iter()
        .find(|record| is_spf_record(record))
    else {
        return SpfReport::not_found("no SPF record");
    };
    let evaluation = validate_spf(client, &record, domain.as_str(), deadline).await;
    SpfReport::success(record, evaluation)
}

async fn dmarc_branch<C>(client: &C, domain: &DomainName) -> DmarcReport
where
    C: DnsQuery + ?Sized,
{
    let name = domain.prefixed("_dmarc");
    let answers = match client.query(&name, RecordType::Txt).await {
        Ok(answers) => answers,
        Err(err) => {
            warn!(%domain, error = %err, "DMARC branch failed");
            return DmarcReport::error(format!("DMARC lookup failed: {err}"));
        }
    };
    let Some(record) = decode_txt(&answers)
        .into_iter()
        .find(|record| is_dmarc_record(record))
    else {
        return DmarcReport::not_found("no DMARC record");
    };
    let evaluation = validate_dmarc(&record);
    DmarcReport::success(record, evaluation)
}
