use crate::auth::{DkimResult, DmarcEvaluation, LookupStatus, SpfEvaluation};
use crate::domain::DomainName;
use crate::mx::MxRecord;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MxReport {
    pub status: LookupStatus,
    pub records: Vec<MxRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MxReport {
    pub(crate) fn success(records: Vec<MxRecord>) -> Self {
        Self {
            status: LookupStatus::Success,
            records,
            error: None,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self {
            status: LookupStatus::NotFound,
            records: Vec::new(),
            error: Some("no MX records".to_string()),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::Error,
            records: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// A TXT-record branch (SPF or DMARC): the record found and its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport<E> {
    pub status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(flatten)]
    pub evaluation: Option<E>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<E> RecordReport<E> {
    pub(crate) fn success(record: String, evaluation: E) -> Self {
        Self {
            status: LookupStatus::Success,
            record: Some(record),
            evaluation: Some(evaluation),
            error: None,
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::NotFound,
            record: None,
            evaluation: None,
            error: Some(message.into()),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::Error,
            record: None,
            evaluation: None,
            error: Some(message.into()),
        }
    }
}

pub type SpfReport = RecordReport<SpfEvaluation>;
pub type DmarcReport = RecordReport<DmarcEvaluation>;

/// Shell commands a reader can run to probe the primary MX; never executed here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticCommands {
    pub telnet: String,
    pub netcat: String,
    pub openssl: String,
    pub dig: String,
}

impl DiagnosticCommands {
    pub fn all(&self) -> [&str; 4] {
        [
            self.telnet.as_str(),
            self.netcat.as_str(),
            self.openssl.as_str(),
            self.dig.as_str(),
        ]
    }
}

/// Email authentication posture of one domain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAuthReport {
    pub domain: DomainName,
    pub mx: MxReport,
    pub spf: SpfReport,
    pub dmarc: DmarcReport,
    /// Present only when a DKIM selector was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dkim: Option<DkimResult>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_commands: Option<DiagnosticCommands>,
}
