use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::dns::{DnsQuery, RecordType, decode_txt};

use super::SpfEvaluation;

pub const SPF_VERSION: &str = "v=spf1";
/// Deepest include level that is still expanded; the top-level record is depth 0.
pub const MAX_SPF_DEPTH: usize = 10;
pub const SPF_LOOKUP_LIMIT: usize = 10;
pub const SPF_LOOKUP_WARN: usize = 8;
pub const DEFAULT_SPF_BUDGET: Duration = Duration::from_secs(10);

/// State shared by every level of one top-level SPF validation.
///
/// Created fresh per validation and passed down the recursion by reference;
/// never reused across validations.
#[derive(Debug)]
pub struct SpfWalk {
    visited: HashSet<String>,
    deadline: Instant,
    timed_out: bool,
}

impl SpfWalk {
    pub fn new(deadline: Instant) -> Self {
        Self {
            visited: HashSet::new(),
            deadline,
            timed_out: false,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// One timeout warning per walk, however many levels notice it.
    fn record_timeout(&mut self, evaluation: &mut SpfEvaluation, domain: &str) {
        if self.timed_out {
            return;
        }
        self.timed_out = true;
        warn!(%domain, "SPF validation budget exhausted");
        evaluation.warnings.push(format!(
            "SPF validation timed out at {domain}; remaining includes were not expanded"
        ));
    }
}

pub fn is_spf_record(record: &str) -> bool {
    record
        .split_whitespace()
        .next()
        .is_some_and(|version| version.eq_ignore_ascii_case(SPF_VERSION))
}

/// Validates `record` published at `domain`, expanding includes until `deadline`.
///
/// Lookup-count thresholds are checked once against the whole tree.
pub async fn validate_spf<C>(
    client: &C,
    record: &str,
    domain: &str,
    deadline: Instant,
) -> SpfEvaluation
where
    C: DnsQuery + ?Sized,
{
    let mut walk = SpfWalk::new(deadline);
    let mut evaluation = validate_spf_with(client, record, domain, &mut walk, 0).await;
    apply_lookup_limits(&mut evaluation);
    debug!(
        %domain,
        lookups = evaluation.lookup_count,
        includes = evaluation.expanded_includes.len(),
        warnings = evaluation.warnings.len(),
        "SPF validated"
    );
    evaluation
}

/// One level of the recursion. Guards (deadline, depth, cycle) end this level
/// with a warning; they never fail the evaluation.
pub fn validate_spf_with<'a, C>(
    client: &'a C,
    record: &'a str,
    domain: &'a str,
    walk: &'a mut SpfWalk,
    depth: usize,
) -> Pin<Box<dyn Future<Output = SpfEvaluation> + Send + 'a>>
where
    C: DnsQuery + ?Sized,
{
    Box::pin(async move {
        let mut tokens = record.split_whitespace();
        let Some(version) = tokens
            .next()
            .filter(|token| token.eq_ignore_ascii_case(SPF_VERSION))
        else {
            return SpfEvaluation::invalid();
        };
        let mechanisms: Vec<String> = tokens.map(str::to_string).collect();
        let mut evaluation = SpfEvaluation::parsed(version, mechanisms.clone());

        if walk.expired() {
            walk.record_timeout(&mut evaluation, domain);
            return evaluation;
        }
        if depth > MAX_SPF_DEPTH {
            warn!(%domain, depth, "SPF nesting too deep");
            evaluation.warnings.push(format!(
                "SPF nesting too deep at {domain} (depth {depth}, max {MAX_SPF_DEPTH})"
            ));
            return evaluation;
        }
        let key = domain_key(domain);
        if walk.visited.contains(&key) {
            warn!(%domain, "SPF include cycle");
            evaluation.warnings.push(format!(
                "Circular reference detected: {domain} was already evaluated in this SPF tree"
            ));
            return evaluation;
        }
        walk.visited.insert(key);

        for mechanism in &mechanisms {
            match classify(mechanism) {
                Mechanism::Include(target) => {
                    evaluation.lookup_count += 1;
                    evaluation.expanded_includes.push(target.to_string());
                    if walk.expired() {
                        walk.record_timeout(&mut evaluation, domain);
                        continue;
                    }
                    match fetch_include(client, target, walk.deadline).await {
                        IncludeLookup::Record(child_record) => {
                            let child =
                                validate_spf_with(client, &child_record, target, walk, depth + 1)
                                    .await;
                            evaluation.absorb(child);
                        }
                        IncludeLookup::Failed(reason) => {
                            evaluation
                                .warnings
                                .push(format!("SPF include lookup failed for {target}: {reason}"));
                        }
                        IncludeLookup::TimedOut => walk.record_timeout(&mut evaluation, domain),
                    }
                }
                Mechanism::HostLookup => evaluation.lookup_count += 1,
                Mechanism::Other => {}
            }
        }

        evaluation
    })
}

fn apply_lookup_limits(evaluation: &mut SpfEvaluation) {
    let count = evaluation.lookup_count;
    if count > SPF_LOOKUP_LIMIT {
        evaluation.warnings.push(format!(
            "SPF lookup limit exceeded: {count} DNS lookups (max {SPF_LOOKUP_LIMIT})"
        ));
    } else if count > SPF_LOOKUP_WARN {
        evaluation.warnings.push(format!(
            "SPF lookup count approaching limit: {count} of {SPF_LOOKUP_LIMIT} DNS lookups"
        ));
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Mechanism<'r> {
    Include(&'r str),
    /// `a`, `mx` and their `:domain` / `/cidr` forms: one lookup, not expanded.
    HostLookup,
    Other,
}

fn classify(token: &str) -> Mechanism<'_> {
    let body = token.trim_start_matches(['+', '-', '~', '?']);
    if let Some((name, target)) = body.split_once(':') {
        if name.eq_ignore_ascii_case("include") {
            return Mechanism::Include(target);
        }
        if name.eq_ignore_ascii_case("a") || name.eq_ignore_ascii_case("mx") {
            return Mechanism::HostLookup;
        }
        return Mechanism::Other;
    }
    let name = body.split('/').next().unwrap_or(body);
    if name.eq_ignore_ascii_case("a") || name.eq_ignore_ascii_case("mx") {
        Mechanism::HostLookup
    } else {
        Mechanism::Other
    }
}

enum IncludeLookup {
    Record(String),
    Failed(String),
    TimedOut,
}

async fn fetch_include<C>(client: &C, target: &str, deadline: Instant) -> IncludeLookup
where
    C: DnsQuery + ?Sized,
{
    match tokio::time::timeout_at(deadline, client.query(target, RecordType::Txt)).await {
        Err(_) => IncludeLookup::TimedOut,
        Ok(Err(err)) => IncludeLookup::Failed(err.to_string()),
        Ok(Ok(answers)) => decode_txt(&answers)
            .into_iter()
            .find(|record| is_spf_record(record))
            .map(IncludeLookup::Record)
            .unwrap_or_else(|| IncludeLookup::Failed("no SPF record published".to_string())),
    }
}

fn domain_key(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}
