//! In-memory resolver shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::dns::{DnsAnswer, DnsQuery, Lookup, QueryError, RecordType};

type Key = (String, RecordType);

pub(crate) struct StubResolver {
    records: HashMap<Key, Option<Vec<String>>>,
    delay: Option<Duration>,
    log: Mutex<Vec<Key>>,
}

impl StubResolver {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            delay: None,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Every query sleeps this long (on the tokio clock) before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn insert_records<I, S>(&mut self, name: &str, record_type: RecordType, records: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = records.into_iter().map(Into::into).collect();
        self.records
            .insert((normalize_name(name), record_type), Some(values));
    }

    /// TXT data is stored quoted, the way DoH servers present it.
    pub(crate) fn insert_txt<I, S>(&mut self, name: &str, records: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let quoted: Vec<String> = records
            .into_iter()
            .map(|record| format!("\"{}\"", record.into()))
            .collect();
        self.insert_records(name, RecordType::Txt, quoted);
    }

    pub(crate) fn fail(&mut self, name: &str, record_type: RecordType) {
        self.records.insert((normalize_name(name), record_type), None);
    }

    pub(crate) fn queries(&self) -> Vec<Key> {
        self.log.lock().expect("log lock").clone()
    }

    pub(crate) fn asked(&self, name: &str, record_type: RecordType) -> bool {
        let key = (normalize_name(name), record_type);
        self.queries().contains(&key)
    }
}

#[async_trait]
impl DnsQuery for StubResolver {
    async fn query(&self, name: &str, record_type: RecordType) -> Lookup {
        let key = (normalize_name(name), record_type);
        self.log.lock().expect("log lock").push(key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.records.get(&key) {
            Some(Some(values)) => Ok(values
                .iter()
                .map(|data| DnsAnswer::new(format!("{}.", key.0), record_type, 300, data.clone()))
                .collect()),
            Some(None) => Err(QueryError::timeout(name, record_type)),
            None => Ok(Vec::new()),
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
