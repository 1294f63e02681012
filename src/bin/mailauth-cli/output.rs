use anyhow::{Context, Result, bail};

use crate::args::Cli;
use mailauth_lib::{EmailAuthReport, LookupStatus};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRow {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<EmailAuthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputRow {
    pub fn report(input: &str, report: EmailAuthReport) -> Self {
        Self {
            input: input.to_string(),
            report: Some(report),
            error: None,
        }
    }

    pub fn invalid(input: &str, reason: String) -> Self {
        Self {
            input: input.to_string(),
            report: None,
            error: Some(reason),
        }
    }
}

pub fn any_invalid(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| row.report.is_none())
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        let Some(report) = &row.report else {
            println!(
                "[INVALID] {} :: {}",
                row.input,
                row.error.as_deref().unwrap_or("invalid domain")
            );
            continue;
        };

        println!("[{}]", report.domain);
        for line in human_lines(report) {
            println!("        {line}");
        }
    }
    Ok(())
}

fn human_lines(report: &EmailAuthReport) -> Vec<String> {
    let mut lines = Vec::new();

    let mx = &report.mx;
    if mx.status == LookupStatus::Success {
        let hosts: Vec<String> = mx
            .records
            .iter()
            .map(|record| {
                let ips = record
                    .ip_addresses
                    .as_ref()
                    .filter(|ips| !ips.is_empty())
                    .map(|ips| format!(" [{}]", ips.join(", ")))
                    .unwrap_or_default();
                format!("{} {}{ips}", record.priority, record.exchange)
            })
            .collect();
        lines.push(format!("mx: {}", hosts.join("; ")));
    } else {
        lines.push(branch_line("mx", mx.status, mx.error.as_deref()));
    }

    let spf = &report.spf;
    match (&spf.record, &spf.evaluation) {
        (Some(record), Some(evaluation)) => {
            lines.push(format!(
                "spf: {record} (lookups={}, includes={})",
                evaluation.lookup_count,
                evaluation.expanded_includes.len()
            ));
            lines.extend(evaluation.warnings.iter().map(|w| format!("  ! {w}")));
        }
        _ => lines.push(branch_line("spf", spf.status, spf.error.as_deref())),
    }

    let dmarc = &report.dmarc;
    match (&dmarc.record, &dmarc.evaluation) {
        (Some(record), Some(evaluation)) => {
            lines.push(format!("dmarc: {record}"));
            lines.extend(evaluation.warnings.iter().map(|w| format!("  ! {w}")));
        }
        _ => lines.push(branch_line("dmarc", dmarc.status, dmarc.error.as_deref())),
    }

    if let Some(dkim) = &report.dkim {
        match &dkim.record {
            Some(record) => {
                lines.push(format!("dkim[{}]: {record}", dkim.selector));
                lines.extend(dkim.warnings.iter().map(|w| format!("  ! {w}")));
            }
            None => lines.push(branch_line(
                &format!("dkim[{}]", dkim.selector),
                dkim.status,
                dkim.error.as_deref(),
            )),
        }
    }

    lines.extend(report.recommendations.iter().map(|r| format!("-> {r}")));

    if let Some(commands) = &report.diagnostic_commands {
        lines.extend(commands.all().iter().map(|c| format!("$ {c}")));
    }

    lines
}

fn branch_line(label: &str, status: LookupStatus, error: Option<&str>) -> String {
    match error {
        Some(error) => format!("{label}: {} ({error})", status.as_str()),
        None => format!("{label}: {}", status.as_str()),
    }
}

fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
const CSV_HEADER: [&str; 12] = [
    "input",
    "domain",
    "mx_status",
    "mx_hosts",
    "spf_status",
    "spf_lookups",
    "spf_warnings",
    "dmarc_status",
    "dmarc_policy",
    "dkim_status",
    "recommendations",
    "error",
];

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    let Some(report) = &row.report else {
        let mut record = vec![String::new(); CSV_HEADER.len()];
        record[0] = row.input.clone();
        record[CSV_HEADER.len() - 1] = row.error.clone().unwrap_or_default();
        return record;
    };

    let hosts: Vec<&str> = report
        .mx
        .records
        .iter()
        .map(|record| record.exchange.as_str())
        .collect();
    let spf = report.spf.evaluation.as_ref();
    let policy = report
        .dmarc
        .evaluation
        .as_ref()
        .and_then(|evaluation| evaluation.policy.clone());

    vec![
        row.input.clone(),
        report.domain.to_string(),
        report.mx.status.as_str().to_string(),
        hosts.join("|"),
        report.spf.status.as_str().to_string(),
        spf.map(|evaluation| evaluation.lookup_count.to_string())
            .unwrap_or_default(),
        spf.map(|evaluation| evaluation.warnings.join("|"))
            .unwrap_or_default(),
        report.dmarc.status.as_str().to_string(),
        policy.unwrap_or_default(),
        report
            .dkim
            .as_ref()
            .map(|dkim| dkim.status.as_str().to_string())
            .unwrap_or_default(),
        report.recommendations.join("|"),
        String::new(),
    ]
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
