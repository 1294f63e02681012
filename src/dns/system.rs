use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    proto::rr::{RData, RecordType as WireType},
};

use super::{DEFAULT_QUERY_TIMEOUT, DnsAnswer, DnsQuery, Lookup, QueryError, RecordType};

/// [`DnsQuery`] over the host's resolver configuration (`/etc/resolv.conf`).
pub struct SystemResolver {
    inner: TokioAsyncResolver,
    timeout: Duration,
}

impl SystemResolver {
    pub fn from_system_conf() -> Result<Self, ResolveError> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()?;
        Ok(Self {
            inner,
            timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }
}

#[async_trait]
impl DnsQuery for SystemResolver {
    async fn query(&self, name: &str, record_type: RecordType) -> Lookup {
        debug!(%name, %record_type, "system DNS query");
        let wire_type = WireType::from(record_type.code());
        let lookup = match tokio::time::timeout(self.timeout, self.inner.lookup(name, wire_type)).await
        {
            Err(_) => {
                warn!(%name, %record_type, "system DNS lookup timed out");
                return Err(QueryError::timeout(name, record_type));
            }
            Ok(Err(err)) if should_treat_as_empty(&err) => return Ok(Vec::new()),
            Ok(Err(err)) => {
                warn!(%name, %record_type, error = %err, "system DNS lookup unavailable");
                return Err(QueryError::resolver(name, record_type, err));
            }
            Ok(Ok(lookup)) => lookup,
        };

        let answers = lookup
            .record_iter()
            .filter(|record| record.record_type() == wire_type)
            .filter_map(|record| {
                let data = record.data().map(presentation)?;
                Some(DnsAnswer::new(
                    record.name().to_utf8(),
                    record_type,
                    record.ttl(),
                    data,
                ))
            })
            .collect::<Vec<_>>();
        debug!(%name, %record_type, count = answers.len(), "system DNS answer");
        Ok(answers)
    }
}

fn presentation(rdata: &RData) -> String {
    match rdata {
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|piece| String::from_utf8_lossy(piece))
            .collect(),
        other => other.to_string(),
    }
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
