use std::net::IpAddr;

use futures::future::join_all;
use tracing::debug;

use crate::dns::{DnsAnswer, DnsQuery, Lookup, RecordType, normalize_exchange};

use super::MxRecord;

/// Annotates `record` with its A/AAAA addresses and the PTR names of the first one.
///
/// Lookup failures degrade to empty lists. Only the first address is reverse
/// resolved, and IPv6 reverse lookups are not attempted. A null MX (`0 .`) has
/// no host to look up and is returned untouched.
pub async fn enrich<C>(client: &C, mut record: MxRecord) -> MxRecord
where
    C: DnsQuery + ?Sized,
{
    if record.is_null() {
        return record;
    }
    let host = record.exchange.clone();
    let (v4, v6) = tokio::join!(
        client.query(&host, RecordType::A),
        client.query(&host, RecordType::Aaaa)
    );

    let mut addresses = collect_addresses(v4, RecordType::A);
    addresses.extend(collect_addresses(v6, RecordType::Aaaa));

    record.ptr_names = match addresses.first() {
        Some(first) => Some(reverse_lookup(client, first).await),
        None => None,
    };
    debug!(
        exchange = %host,
        addresses = addresses.len(),
        ptr = record.ptr_names.as_ref().map_or(0, Vec::len),
        "MX host enriched"
    );
    record.ip_addresses = Some(addresses);
    record
}

/// Enriches every record concurrently; output order matches input order.
pub async fn enrich_all<C>(client: &C, records: Vec<MxRecord>) -> Vec<MxRecord>
where
    C: DnsQuery + ?Sized,
{
    join_all(records.into_iter().map(|record| enrich(client, record))).await
}

/// `in-addr.arpa` name for an IPv4 address. IPv6 yields `None`.
pub fn reverse_name(ip: &str) -> Option<String> {
    match ip.parse::<IpAddr>().ok()? {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            Some(format!("{d}.{c}.{b}.{a}.in-addr.arpa"))
        }
        IpAddr::V6(_) => None,
    }
}

async fn reverse_lookup<C>(client: &C, ip: &str) -> Vec<String>
where
    C: DnsQuery + ?Sized,
{
    let Some(name) = reverse_name(ip) else {
        return Vec::new();
    };
    match client.query(&name, RecordType::Ptr).await {
        Ok(answers) => answers
            .iter()
            .filter(|answer| answer.record_type == RecordType::Ptr)
            .map(|answer| normalize_exchange(answer.data.trim()))
            .filter(|name| !name.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn collect_addresses(lookup: Lookup, record_type: RecordType) -> Vec<String> {
    let Ok(answers) = lookup else {
        return Vec::new();
    };
    answers
        .iter()
        .filter(|answer| answer.record_type == record_type)
        .filter_map(address_of)
        .collect()
}

fn address_of(answer: &DnsAnswer) -> Option<String> {
    let ip = answer.data.trim().parse::<IpAddr>().ok()?;
    Some(ip.to_string())
}
