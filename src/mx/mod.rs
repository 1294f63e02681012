//! Mail exchangers and their host annotations.
//!
//! [`decode_mx`](crate::dns::decode_mx) produces [`MxRecord`]s; [`enrich`] and
//! [`enrich_all`] fill in forward and reverse lookups for each exchange.

mod enrich;
mod types;

pub use enrich::{enrich, enrich_all, reverse_name};
pub use types::MxRecord;

#[cfg(test)]
mod tests;
