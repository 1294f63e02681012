use tracing::debug;

use crate::dns::{DnsQuery, RecordType, decode_txt};
use crate::domain::DomainName;

use super::DkimResult;
use super::tags::{contains_ignore_ascii_case, parse_tags};

pub const DKIM_VERSION: &str = "v=DKIM1";

/// One TXT lookup at `{selector}._domainkey.{domain}`.
pub async fn probe_dkim<C>(client: &C, selector: &str, domain: &DomainName) -> DkimResult
where
    C: DnsQuery + ?Sized,
{
    let name = domain.prefixed(&format!("{selector}._domainkey"));
    let answers = match client.query(&name, RecordType::Txt).await {
        Ok(answers) => answers,
        Err(err) => return DkimResult::error(selector, err.to_string()),
    };

    let found = decode_txt(&answers)
        .into_iter()
        .find(|record| contains_ignore_ascii_case(record, DKIM_VERSION));
    debug!(%name, found = found.is_some(), "DKIM probed");
    match found {
        Some(record) => {
            let warnings = key_warnings(&record);
            DkimResult::found(selector, record, warnings)
        }
        None => DkimResult::not_found(selector),
    }
}

fn key_warnings(record: &str) -> Vec<String> {
    let tags = parse_tags(record);
    let mut warnings = Vec::new();
    match tags.get("p") {
        None => warnings.push("DKIM record has no public key (p=) tag".to_string()),
        Some(key) if key.is_empty() => {
            warnings.push("DKIM public key (p=) is empty; the key is revoked".to_string())
        }
        Some(_) => {}
    }
    let testing = tags
        .get("t")
        .is_some_and(|flags| flags.split(':').any(|flag| flag.trim().eq_ignore_ascii_case("y")));
    if testing {
        warnings.push("DKIM key is in testing mode (t=y)".to_string());
    }
    warnings
}
