use crate::auth::{DkimResult, LookupStatus};
use crate::domain::DomainName;

use super::{DiagnosticCommands, DmarcReport, MxReport, SpfReport};

pub(crate) fn recommendations(
    domain: &DomainName,
    mx: &MxReport,
    spf: &SpfReport,
    dmarc: &DmarcReport,
    dkim: Option<&DkimResult>,
) -> Vec<String> {
    let mut out = Vec::new();

    if spf.status == LookupStatus::NotFound {
        out.push(format!(
            "Add an SPF record (TXT \"v=spf1 ... -all\") at {domain} listing the hosts allowed to send its mail"
        ));
    }
    if dmarc.status == LookupStatus::NotFound {
        out.push(format!(
            "Add a DMARC record at _dmarc.{domain}, e.g. \"v=DMARC1; p=none; rua=mailto:dmarc@{domain}\", then tighten to quarantine or reject"
        ));
    }
    if mx.status.is_success() && spf.status.is_success() && dmarc.status.is_success() {
        out.push("MX, SPF and DMARC records are all in place".to_string());
    }
    match dkim {
        None => out.push("Provide a DKIM selector to check the DKIM public key as well".to_string()),
        Some(result) if result.status == LookupStatus::NotFound => out.push(format!(
            "No DKIM record found for selector '{}'; check the selector name or publish the key",
            result.selector
        )),
        Some(_) => {}
    }

    out
}

/// Connectivity checks against the first (lowest priority value) MX host that
/// is not a null MX.
pub(crate) fn diagnostic_commands(mx: &MxReport) -> Option<DiagnosticCommands> {
    if !mx.status.is_success() {
        return None;
    }
    let host = &mx
        .records
        .iter()
        .find(|record| !record.is_null())?
        .exchange;
    Some(DiagnosticCommands {
        telnet: format!("telnet {host} 25"),
        netcat: format!("nc -vz {host} 25"),
        openssl: format!("openssl s_client -connect {host}:25 -starttls smtp"),
        dig: format!("dig +short A {host}"),
    })
}
