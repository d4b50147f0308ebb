//! Turns a WHOIS outcome into an availability verdict.
//!
//! WHOIS has no standard response schema, so everything here is heuristic:
//! availability comes from a fixed set of "no such object" phrases, and the
//! registrar/date fields are best-effort enrichment.

use crate::types::{Availability, AvailabilityVerdict, WhoisOutcome};
use lazy_static::lazy_static;
use regex::Regex;

/// Case-folded phrases that mean the registry has no record of the domain.
pub const AVAILABLE_INDICATORS: [&str; 7] = [
    "no match",
    "not found",
    "no entries found",
    "no data found",
    "status: available",
    "no matching record",
    "not registered",
];

/// Number of raw lines kept in `raw_snippet`.
pub const SNIPPET_LINES: usize = 10;

/// Note attached when a failed query is read as "available".
pub const FAILURE_AVAILABLE_NOTE: &str = "query failed - likely available or unsupported registry";

/// Note attached when a failed query could not be interpreted.
pub const FAILURE_UNKNOWN_NOTE: &str =
    "WHOIS lookup failed - domain may be available or service unavailable";

// Failure reasons that say nothing about the registry, only about the path to it.
const TRANSIENT_MARKERS: [&str; 8] = [
    "timeout",
    "timed out",
    "enotfound",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "temporary failure in name resolution",
    "no address associated",
];

lazy_static! {
    static ref REGISTRAR_RE: Regex =
        Regex::new(r"(?i)^\s*(?:sponsoring\s+)?registrar:\s*(.*)$").unwrap();
    static ref CREATED_RE: Regex = Regex::new(r"(?i)creation date:\s*(.*)$").unwrap();
    static ref EXPIRY_RE: Regex = Regex::new(r"(?i)expir(?:y|ation) date:\s*(.*)$").unwrap();
}

/// Classify one WHOIS outcome for `domain`.
pub fn classify(domain: &str, outcome: &WhoisOutcome) -> AvailabilityVerdict {
    match outcome {
        WhoisOutcome::RawText(text) => classify_text(text),
        WhoisOutcome::QueryFailure { reason } => {
            let verdict = classify_failure(reason);
            tracing::debug!(
                domain = %domain,
                status = %verdict.status,
                reason = %reason,
                "Classified failed WHOIS query"
            );
            verdict
        }
    }
}

/// Classify a successful raw response.
pub fn classify_text(text: &str) -> AvailabilityVerdict {
    let lower = text.to_lowercase();
    let available = AVAILABLE_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator));

    let mut verdict = if available {
        AvailabilityVerdict::new(Availability::Available)
    } else {
        let mut verdict = AvailabilityVerdict::new(Availability::Registered);
        verdict.registrar = extract_field(text, &REGISTRAR_RE);
        verdict.created_date = extract_field(text, &CREATED_RE);
        verdict.expiry_date = extract_field(text, &EXPIRY_RE);
        verdict
    };

    verdict.raw_snippet = Some(raw_snippet(text));
    verdict
}

/// Classify a query that never produced a response.
///
/// Transient network conditions are `Unknown`. Anything else (the registry or
/// client rejected the query outright) is read as `Available`, which is known
/// to misfire on rate limiting and malformed queries.
pub fn classify_failure(reason: &str) -> AvailabilityVerdict {
    let status = if is_transient_failure(reason) {
        Availability::Unknown
    } else {
        Availability::Available
    };

    let mut verdict = AvailabilityVerdict::new(status);
    verdict.note = Some(match status {
        Availability::Unknown => FAILURE_UNKNOWN_NOTE.to_string(),
        _ => FAILURE_AVAILABLE_NOTE.to_string(),
    });
    verdict.error = Some(reason.to_string());
    verdict
}

/// Whether a failure reason describes a timeout or name-resolution problem.
pub fn is_transient_failure(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// First [`SNIPPET_LINES`] lines of the response followed by `...`.
pub fn raw_snippet(text: &str) -> String {
    let head: Vec<&str> = text.lines().take(SNIPPET_LINES).collect();
    format!("{}...", head.join("\n"))
}

/// First value for a labelled field, scanning line by line.
///
/// Block-style records put the value on the following line
/// (`Registrar:\n    Example Ltd`); an empty inline value takes the next
/// non-empty line instead.
fn extract_field(text: &str, pattern: &Regex) -> Option<String> {
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };

        let inline = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if !inline.is_empty() {
            return Some(inline.to_string());
        }

        return lines
            .map(str::trim)
            .find(|l| !l.is_empty())
            .filter(|l| !l.ends_with(':'))
            .map(str::to_string);
    }

    None
}
