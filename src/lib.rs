#![forbid(unsafe_code)]
//! mailauth_lib: email domain authentication report (MX, SPF, DMARC, DKIM) over DNS.

pub mod auth;
pub mod dns;
pub mod domain;
pub mod mx;
pub mod report;

pub use auth::{
    DkimResult, DmarcEvaluation, LookupStatus, SpfEvaluation, SpfWalk, probe_dkim, validate_dmarc,
    validate_spf,
};
pub use dns::{
    DnsAnswer, DnsQuery, DohClient, DohOptions, QueryError, RecordType, decode_mx, decode_txt,
};
pub use domain::{DomainError, DomainName};
pub use mx::{MxRecord, enrich, enrich_all};
pub use report::{
    DiagnosticCommands, DmarcReport, EmailAuthReport, MxReport, ReportError, ReportOptions,
    SpfReport, build_report, resolve_email_authentication,
};

#[cfg(feature = "with-system-dns")]
pub use dns::SystemResolver;

#[cfg(test)]
mod test_support;
