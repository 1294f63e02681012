use crate::mx::MxRecord;

use super::{DnsAnswer, RecordType};

/// Decodes MX answers (`"<priority> <exchange>"`), ascending by priority.
///
/// Ties keep answer order. Answers that are not MX or do not parse are skipped.
pub fn decode_mx(answers: &[DnsAnswer]) -> Vec<MxRecord> {
    let mut records: Vec<MxRecord> = answers
        .iter()
        .filter(|answer| answer.record_type == RecordType::Mx)
        .filter_map(|answer| {
            let mut parts = answer.data.split_whitespace();
            let priority = parts.next()?.parse::<u16>().ok()?;
            let exchange = parts.next()?;
            Some(MxRecord::new(priority, normalize_exchange(exchange), answer.ttl))
        })
        .collect();

    // stable: equal priorities stay in DNS order
    records.sort_by_key(|record| record.priority);
    records
}

/// Strips one layer of surrounding double quotes from each TXT answer.
pub fn decode_txt(answers: &[DnsAnswer]) -> Vec<String> {
    answers
        .iter()
        .filter(|answer| answer.record_type == RecordType::Txt)
        .map(|answer| dequote(&answer.data).to_string())
        .collect()
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    let trimmed = exchange.strip_suffix('.').unwrap_or(exchange);
    trimmed.to_ascii_lowercase()
}

fn dequote(data: &str) -> &str {
    let data = data.strip_prefix('"').unwrap_or(data);
    data.strip_suffix('"').unwrap_or(data)
}
