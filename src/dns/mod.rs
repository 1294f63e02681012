//! DNS question plumbing.
//!
//! [`DnsQuery`] is the single seam through which the rest of the crate talks to
//! DNS. [`DohClient`] answers it over DNS-over-HTTPS; the `with-system-dns`
//! feature adds [`SystemResolver`], backed by the host's resolver configuration.
//! The decoders in this module turn raw answers into typed records.

mod decode;
mod doh;
mod error;
#[cfg(feature = "with-system-dns")]
mod system;
mod types;

pub use decode::{decode_mx, decode_txt};
pub(crate) use decode::normalize_exchange;
pub use doh::{DEFAULT_DOH_ENDPOINT, DEFAULT_QUERY_TIMEOUT, DohClient, DohOptions};
pub use error::QueryError;
#[cfg(feature = "with-system-dns")]
pub use system::SystemResolver;
pub use types::{DnsAnswer, RecordType};

use async_trait::async_trait;

/// Answer set for one DNS question, or the reason there is none.
pub type Lookup = Result<Vec<DnsAnswer>, QueryError>;

/// Issues one DNS question.
///
/// Implementations own their per-call timeout. A name that does not exist is an
/// empty answer set; transport failures, timeouts and server errors are
/// [`QueryError`]s. Implementations never retry.
#[async_trait]
pub trait DnsQuery: Send + Sync {
    async fn query(&self, name: &str, record_type: RecordType) -> Lookup;
}

#[cfg(test)]
mod tests;
