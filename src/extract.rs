use std::str::FromStr;
use std::sync::OnceLock;

use email_address::EmailAddress;
use regex::Regex;
use thiserror::Error;

/// GitHub's masked noreply addresses carry no contact value.
const MASKED_SUFFIX: &str = "github.com";

/// Why a candidate was dropped instead of becoming a finding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("not a valid email address: {0}")]
    InvalidSyntax(String),
    #[error("masked noreply address: {0}")]
    MaskedDomain(String),
}

fn bracketed_addr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Angle-bracket address syntax as found in patch headers ("From: Name <addr>")
    RE.get_or_init(|| Regex::new(r"<([^<>\s]+@[^<>\s]+\.[^<>\s]+)>").unwrap())
}

/// Validate a candidate address and return its canonical form.
///
/// Syntax-only check, no DNS lookup. The canonical form keeps the local part
/// as written and lowercases the domain.
pub fn normalize_email(candidate: &str) -> Result<String, Rejection> {
    let candidate = candidate.trim();
    let parsed = EmailAddress::from_str(candidate)
        .map_err(|_| Rejection::InvalidSyntax(candidate.to_string()))?;

    let normalized = format!("{}@{}", parsed.local_part(), parsed.domain().to_lowercase());
    if normalized.ends_with(MASKED_SUFFIX) {
        return Err(Rejection::MaskedDomain(normalized));
    }
    Ok(normalized)
}

/// Pull every usable email address out of raw patch text, in order of appearance.
/// Candidates that fail validation or point at the masked domain are skipped.
pub fn extract_emails(text: &str) -> Vec<String> {
    bracketed_addr()
        .captures_iter(text)
        .filter_map(|caps| normalize_email(&caps[1]).ok())
        .collect()
}
