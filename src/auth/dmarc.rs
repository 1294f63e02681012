use super::DmarcEvaluation;
use super::tags::{parse_tags, starts_with_ignore_ascii_case};

pub const DMARC_VERSION: &str = "v=DMARC1";

pub fn is_dmarc_record(record: &str) -> bool {
    starts_with_ignore_ascii_case(record.trim(), DMARC_VERSION)
}

/// Single pass over the tag list. Warnings are advisory; only a missing
/// version prefix makes the evaluation invalid.
pub fn validate_dmarc(record: &str) -> DmarcEvaluation {
    if !is_dmarc_record(record) {
        return DmarcEvaluation::default();
    }

    let tags = parse_tags(record);
    let mut evaluation = DmarcEvaluation {
        is_valid: true,
        ..DmarcEvaluation::default()
    };

    match tags.get("p").map(|policy| policy.to_ascii_lowercase()) {
        None => evaluation
            .warnings
            .push("DMARC record has no policy (p=) tag".to_string()),
        Some(policy) => {
            match policy.as_str() {
                "none" => evaluation.warnings.push(
                    "DMARC policy 'none' only monitors; consider 'quarantine' or 'reject'"
                        .to_string(),
                ),
                "quarantine" | "reject" => {}
                other => evaluation
                    .warnings
                    .push(format!("Unknown DMARC policy '{other}'")),
            }
            evaluation.policy = Some(policy);
        }
    }

    evaluation.subdomain_policy = tags.get("sp").map(|policy| policy.to_ascii_lowercase());

    if let Some(raw) = tags.get("pct") {
        match raw.parse::<u32>() {
            Ok(pct) if pct <= 100 => {
                if pct < 100 {
                    evaluation.warnings.push(format!(
                        "DMARC pct={pct} applies the policy to only part of the mail stream"
                    ));
                }
                evaluation.percentage = Some(pct);
            }
            _ => evaluation.warnings.push(format!(
                "DMARC pct '{raw}' is not a number between 0 and 100"
            )),
        }
    }

    let mut report_addrs = Vec::new();
    for key in ["rua", "ruf"] {
        if let Some(list) = tags.get(key) {
            report_addrs.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|addr| !addr.is_empty())
                    .map(str::to_string),
            );
        }
    }
    if report_addrs.is_empty() {
        evaluation
            .warnings
            .push("No DMARC report addresses (rua/ruf) configured".to_string());
    } else {
        evaluation.report_addrs = Some(report_addrs);
    }

    evaluation
}
