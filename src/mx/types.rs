/// One mail exchanger, optionally annotated with its addresses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MxRecord {
    pub priority: u16,
    pub exchange: String,
    pub ttl: u32,
    /// A then AAAA results; `None` until enriched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<Vec<String>>,
    /// PTR names of the first address; `None` when no address was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptr_names: Option<Vec<String>>,
}

impl MxRecord {
    pub fn new(priority: u16, exchange: impl Into<String>, ttl: u32) -> Self {
        Self {
            priority,
            exchange: exchange.into(),
            ttl,
            ip_addresses: None,
            ptr_names: None,
        }
    }

    /// RFC 7505 null MX: the domain accepts no mail.
    pub fn is_null(&self) -> bool {
        self.exchange.is_empty()
    }

    pub fn is_enriched(&self) -> bool {
        self.ip_addresses.is_some()
    }
}
