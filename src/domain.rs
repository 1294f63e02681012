//! Validated DNS domain names.

use std::fmt;

use thiserror::Error;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;

/// Reasons a string is refused as a [`DomainName`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain is empty")]
    Empty,
    #[error("domain IDNA conversion failed")]
    Idna,
    #[error("domain must contain at least one dot")]
    MissingDot,
    #[error("empty domain label")]
    EmptyLabel,
    #[error("domain label '{label}' length {len} > 63")]
    LabelTooLong { label: String, len: usize },
    #[error("domain label '{label}' cannot start/end with '-'")]
    HyphenEdge { label: String },
    #[error("domain label '{label}' has invalid chars")]
    InvalidChars { label: String },
    #[error("domain length {len} > 253")]
    TooLong { len: usize },
}

/// Lowercase ASCII domain name with RFC 1035 shaped labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(DomainError::Empty);
        }

        let ascii = idna::domain_to_ascii(trimmed)
            .map_err(|_| DomainError::Idna)?
            .to_ascii_lowercase();
        if ascii.is_empty() {
            return Err(DomainError::Empty);
        }
        if ascii.len() > MAX_NAME_LEN {
            return Err(DomainError::TooLong { len: ascii.len() });
        }
        if !ascii.contains('.') {
            return Err(DomainError::MissingDot);
        }

        for label in ascii.split('.') {
            check_label(label)?;
        }

        Ok(Self(ascii))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `label.domain`, e.g. `_dmarc.example.com`.
    pub fn prefixed(&self, label: &str) -> String {
        let label = label.trim().trim_end_matches('.');
        if label.is_empty() {
            self.0.clone()
        } else {
            format!("{}.{}", label.to_ascii_lowercase(), self.0)
        }
    }
}

fn check_label(label: &str) -> Result<(), DomainError> {
    if label.is_empty() {
        return Err(DomainError::EmptyLabel);
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainError::LabelTooLong {
            label: label.to_string(),
            len: label.len(),
        });
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(DomainError::HyphenEdge {
            label: label.to_string(),
        });
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(DomainError::InvalidChars {
            label: label.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_domain_ok() {
        let domain = DomainName::parse("Example.COM.").expect("valid domain");
        assert_eq!(domain.as_str(), "example.com");
    }

    #[test]
    fn idn_converted_to_punycode() {
        let domain = DomainName::parse("bücher.example").expect("valid idn");
        assert_eq!(domain.as_str(), "xn--bcher-kva.example");
    }

    #[test]
    fn label_too_long() {
        let long = "a".repeat(64);
        let err = DomainName::parse(&format!("{long}.com")).expect_err("label too long");
        assert!(matches!(err, DomainError::LabelTooLong { len: 64, .. }));
    }

    #[test]
    fn rejects_hyphen_edges_and_missing_dot() {
        assert!(DomainName::parse("-bad.example.com").is_err());
        assert_eq!(DomainName::parse("localhost"), Err(DomainError::MissingDot));
        assert_eq!(DomainName::parse("   "), Err(DomainError::Empty));
    }

    #[test]
    fn rejects_empty_label() {
        assert!(DomainName::parse("example..com").is_err());
        assert!(DomainName::parse("exa_mple.com").is_err());
    }

    #[test]
    fn prefixed_builds_subdomain() {
        let domain = DomainName::parse("example.com").expect("valid domain");
        assert_eq!(domain.prefixed("_dmarc"), "_dmarc.example.com");
        assert_eq!(
            domain.prefixed("S1._domainkey."),
            "s1._domainkey.example.com"
        );
        assert_eq!(domain.prefixed(""), "example.com");
    }
}
