use std::time::Duration;

use crate::auth::DEFAULT_SPF_BUDGET;

/// Per-report knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    dkim_selector: Option<String>,
    spf_budget: Duration,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty selectors are ignored.
    pub fn with_dkim_selector(mut self, selector: impl Into<String>) -> Self {
        self.dkim_selector = normalize_selector(selector.into());
        self
    }

    /// Wall-clock budget for the whole SPF include tree. Zero keeps the default.
    pub fn with_spf_budget(mut self, budget: Duration) -> Self {
        if !budget.is_zero() {
            self.spf_budget = budget;
        }
        self
    }

    pub fn dkim_selector(&self) -> Option<&str> {
        self.dkim_selector.as_deref()
    }

    pub fn spf_budget(&self) -> Duration {
        self.spf_budget
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            dkim_selector: None,
            spf_budget: DEFAULT_SPF_BUDGET,
        }
    }
}

fn normalize_selector(input: String) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
