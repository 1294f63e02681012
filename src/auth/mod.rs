//! SPF, DMARC and DKIM record evaluation.

mod dkim;
mod dmarc;
mod spf;
mod tags;
mod types;

pub use dkim::{DKIM_VERSION, probe_dkim};
pub use dmarc::{DMARC_VERSION, is_dmarc_record, validate_dmarc};
pub use spf::{
    DEFAULT_SPF_BUDGET, MAX_SPF_DEPTH, SPF_LOOKUP_LIMIT, SPF_LOOKUP_WARN, SPF_VERSION, SpfWalk,
    is_spf_record, validate_spf, validate_spf_with,
};
pub use types::{DkimResult, DmarcEvaluation, LookupStatus, SpfEvaluation};
