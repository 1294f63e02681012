use thiserror::Error;

use super::RecordType;

/// A DNS question that produced no usable answer.
///
/// Every variant is recoverable: callers degrade to "no data" and carry on.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{record_type} lookup for {name} failed: {source}")]
    Transport {
        name: String,
        record_type: RecordType,
        #[source]
        source: reqwest::Error,
    },
    #[error("{record_type} lookup for {name} timed out")]
    Timeout { name: String, record_type: RecordType },
    #[error("{record_type} lookup for {name} returned HTTP {status}")]
    HttpStatus {
        name: String,
        record_type: RecordType,
        status: u16,
    },
    #[error("{record_type} lookup for {name} returned DNS status {status}")]
    DnsStatus {
        name: String,
        record_type: RecordType,
        status: u32,
    },
    #[error("{record_type} lookup for {name} returned an unreadable body: {source}")]
    Decode {
        name: String,
        record_type: RecordType,
        #[source]
        source: reqwest::Error,
    },
    #[cfg(feature = "with-system-dns")]
    #[error("{record_type} lookup for {name} failed: {source}")]
    Resolver {
        name: String,
        record_type: RecordType,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("DNS client initialization failed: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },
}

impl QueryError {
    pub(crate) fn transport(
        name: impl Into<String>,
        record_type: RecordType,
        source: reqwest::Error,
    ) -> Self {
        if source.is_timeout() {
            return Self::timeout(name, record_type);
        }
        Self::Transport {
            name: name.into(),
            record_type,
            source,
        }
    }

    pub(crate) fn timeout(name: impl Into<String>, record_type: RecordType) -> Self {
        Self::Timeout {
            name: name.into(),
            record_type,
        }
    }

    pub(crate) fn http_status(name: impl Into<String>, record_type: RecordType, status: u16) -> Self {
        Self::HttpStatus {
            name: name.into(),
            record_type,
            status,
        }
    }

    pub(crate) fn dns_status(name: impl Into<String>, record_type: RecordType, status: u32) -> Self {
        Self::DnsStatus {
            name: name.into(),
            record_type,
            status,
        }
    }

    pub(crate) fn decode(
        name: impl Into<String>,
        record_type: RecordType,
        source: reqwest::Error,
    ) -> Self {
        Self::Decode {
            name: name.into(),
            record_type,
            source,
        }
    }

    #[cfg(feature = "with-system-dns")]
    pub(crate) fn resolver(
        name: impl Into<String>,
        record_type: RecordType,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Resolver {
            name: name.into(),
            record_type,
            source,
        }
    }

    pub(crate) fn client_init(source: reqwest::Error) -> Self {
        Self::ClientInit { source }
    }
}
