/// Outcome of one report branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Success,
    NotFound,
    Error,
}

impl LookupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of validating one SPF record and everything it includes.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpfEvaluation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanisms: Option<Vec<String>>,
    pub lookup_count: usize,
    pub warnings: Vec<String>,
    pub expanded_includes: Vec<String>,
}

impl SpfEvaluation {
    pub(crate) fn invalid() -> Self {
        Self::default()
    }

    pub(crate) fn parsed(version: &str, mechanisms: Vec<String>) -> Self {
        Self {
            is_valid: true,
            version: Some(version.to_string()),
            mechanisms: Some(mechanisms),
            ..Self::default()
        }
    }

    /// Folds an included record's totals into this one.
    pub(crate) fn absorb(&mut self, child: SpfEvaluation) {
        self.lookup_count += child.lookup_count;
        self.warnings.extend(child.warnings);
        self.expanded_includes.extend(child.expanded_includes);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmarcEvaluation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_addrs: Option<Vec<String>>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DkimResult {
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    pub status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DkimResult {
    pub(crate) fn found(selector: &str, record: String, warnings: Vec<String>) -> Self {
        Self {
            selector: selector.to_string(),
            record: Some(record),
            status: LookupStatus::Success,
            error: None,
            warnings,
        }
    }

    pub(crate) fn not_found(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            record: None,
            status: LookupStatus::NotFound,
            error: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(selector: &str, error: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            record: None,
            status: LookupStatus::Error,
            error: Some(error.into()),
            warnings: Vec::new(),
        }
    }
}
