//! Strict yes/no parsing of a judge reply.
//!
//! The reply's first word decides: after trimming, lower-casing and stripping
//! surrounding quotes and punctuation it must be exactly `yes` or `no`. "Yes, sort of"
//! is a yes; "Eyes" or "Not sure" are malformed rather than silently read either way.

use crate::error::CapabilityError;

/// Parses a judge reply into a verdict.
pub fn parse_verdict(text: &str) -> Result<bool, CapabilityError> {
    let first = text
        .split_whitespace()
        .next()
        .ok_or(CapabilityError::Empty)?;
    let token = first
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    match token.as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(CapabilityError::MalformedResponse(format!(
            "expected Yes or No, got {:?}",
            text.trim()
        ))),
    }
}
