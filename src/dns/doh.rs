use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DnsAnswer, DnsQuery, Lookup, QueryError, RecordType};

pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

const DNS_JSON: &str = "application/dns-json";
const RCODE_NOERROR: u32 = 0;
const RCODE_NXDOMAIN: u32 = 3;

/// Where and how long to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DohOptions {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for DohOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl DohOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        if !endpoint.trim().is_empty() {
            self.endpoint = endpoint.trim().to_string();
        }
        self
    }

    /// A zero timeout keeps the current value.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }
}

/// DNS-over-HTTPS client speaking the JSON dialect (`application/dns-json`).
#[derive(Debug, Clone)]
pub struct DohClient {
    http: reqwest::Client,
    options: DohOptions,
}

impl DohClient {
    pub fn new() -> Result<Self, QueryError> {
        Self::with_options(DohOptions::default())
    }

    pub fn with_options(options: DohOptions) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(QueryError::client_init)?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> &DohOptions {
        &self.options
    }

    async fn fetch(&self, name: &str, record_type: RecordType) -> Lookup {
        let code = record_type.code().to_string();
        let response = self
            .http
            .get(&self.options.endpoint)
            .query(&[("name", name), ("type", code.as_str())])
            .header(ACCEPT, DNS_JSON)
            .send()
            .await
            .map_err(|err| QueryError::transport(name, record_type, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::http_status(name, record_type, status.as_u16()));
        }

        let body: DohResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                QueryError::timeout(name, record_type)
            } else {
                QueryError::decode(name, record_type, err)
            }
        })?;

        match body.status {
            RCODE_NOERROR => Ok(body.into_answers(record_type)),
            RCODE_NXDOMAIN => Ok(Vec::new()),
            other => Err(QueryError::dns_status(name, record_type, other)),
        }
    }
}

#[async_trait]
impl DnsQuery for DohClient {
    async fn query(&self, name: &str, record_type: RecordType) -> Lookup {
        debug!(%name, %record_type, endpoint = %self.options.endpoint, "DoH query");
        let result = self.fetch(name, record_type).await;
        match &result {
            Ok(answers) => debug!(%name, %record_type, count = answers.len(), "DoH answer"),
            Err(err) => warn!(%name, %record_type, error = %err, "DoH lookup unavailable"),
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    name: String,
    #[serde(rename = "type")]
    kind: u16,
    #[serde(rename = "TTL", default)]
    ttl: u32,
    data: String,
}

impl DohResponse {
    /// Keeps only answers of the requested type (CNAME hops are dropped).
    fn into_answers(self, record_type: RecordType) -> Vec<DnsAnswer> {
        self.answer
            .into_iter()
            .filter(|answer| RecordType::from_code(answer.kind) == Some(record_type))
            .map(|answer| {
                let data = match record_type {
                    RecordType::Txt => join_character_strings(&answer.data),
                    _ => answer.data,
                };
                DnsAnswer::new(answer.name, record_type, answer.ttl, data)
            })
            .collect()
    }
}

/// Joins a quoted TXT presentation (`"v=spf1 a " "include:x -all"`) into one string.
///
/// Data that is not quoted, or whose quoting does not parse, is returned as is.
fn join_character_strings(data: &str) -> String {
    let trimmed = data.trim();
    if !trimmed.starts_with('"') {
        return data.to_string();
    }
    parse_character_strings(trimmed).unwrap_or_else(|| data.to_string())
}

fn parse_character_strings(data: &str) -> Option<String> {
    let mut out = Vec::with_capacity(data.len());
    let mut bytes = data.bytes().peekable();
    loop {
        while bytes.next_if(u8::is_ascii_whitespace).is_some() {}
        match bytes.next() {
            None => break,
            Some(b'"') => {}
            Some(_) => return None,
        }
        loop {
            match bytes.next()? {
                b'"' => break,
                b'\\' => {
                    let escaped = bytes.next()?;
                    if escaped.is_ascii_digit() {
                        let hi = escaped - b'0';
                        let mid = bytes.next().filter(u8::is_ascii_digit)? - b'0';
                        let lo = bytes.next().filter(u8::is_ascii_digit)? - b'0';
                        let value = u16::from(hi) * 100 + u16::from(mid) * 10 + u16::from(lo);
                        out.push(u8::try_from(value).ok()?);
                    } else {
                        out.push(escaped);
                    }
                }
                other => out.push(other),
            }
        }
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}
