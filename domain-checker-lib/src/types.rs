//! Core data types for domain availability checking.
//!
//! This module defines the main data structures used throughout the library:
//! the domain query, the raw WHOIS outcome, the availability verdict, price
//! estimates, and the batch result assembled from them.

use crate::error::DomainCheckError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use crate::pricing::PricingTable;

/// The eleven suffixes checked when a caller does not name any.
pub const DEFAULT_TLDS: [&str; 11] = [
    "com", "io", "ai", "cloud", "dev", "app", "tech", "co", "net", "org", "xyz",
];

/// A fully-qualified domain (`name.suffix`).
///
/// The only invariant is that a `.` separates a non-empty base from a
/// non-empty suffix. Registry naming is otherwise free-form and accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainQuery {
    domain: String,
    split: usize,
}

impl DomainQuery {
    /// Parse a domain, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, DomainCheckError> {
        let domain = input.trim();

        if domain.is_empty() {
            return Err(DomainCheckError::invalid_domain(
                domain,
                "Domain name cannot be empty",
            ));
        }

        match domain.rfind('.') {
            Some(split) if split > 0 && split + 1 < domain.len() => Ok(Self {
                domain: domain.to_string(),
                split,
            }),
            _ => Err(DomainCheckError::invalid_domain(
                domain,
                "Expected a name and a suffix separated by '.' (e.g. 'example.com')",
            )),
        }
    }

    /// Build `base.suffix`, tolerating a leading dot on the suffix (`.io`).
    pub fn from_parts(base: &str, suffix: &str) -> Result<Self, DomainCheckError> {
        let suffix = suffix.trim().trim_start_matches('.');
        Self::parse(&format!("{}.{}", base.trim(), suffix))
    }

    /// The full domain string.
    pub fn as_str(&self) -> &str {
        &self.domain
    }

    /// Everything before the last separator.
    pub fn base(&self) -> &str {
        &self.domain[..self.split]
    }

    /// The top-level suffix (after the last separator).
    pub fn suffix(&self) -> &str {
        &self.domain[self.split + 1..]
    }
}

impl fmt::Display for DomainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

/// What a single WHOIS query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum WhoisOutcome {
    /// Response text, verbatim
    RawText(String),

    /// The query could not be completed; `reason` is the original error text
    QueryFailure { reason: String },
}

impl WhoisOutcome {
    /// Convenience constructor for failures.
    pub fn failure<R: Into<String>>(reason: R) -> Self {
        Self::QueryFailure {
            reason: reason.into(),
        }
    }
}

/// Tri-state availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Registered,
    Unknown,
}

impl Availability {
    /// `Some(true)` / `Some(false)` / `None`, the shape tool callers expect.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Availability::Available => Some(true),
            Availability::Registered => Some(false),
            Availability::Unknown => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Registered => write!(f, "registered"),
            Availability::Unknown => write!(f, "unknown"),
        }
    }
}

/// The classifier's verdict for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityVerdict {
    /// `true` / `false` / `null`, mirrors `status`
    pub available: Option<bool>,

    pub status: Availability,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// First lines of the raw response, for auditability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_snippet: Option<String>,

    /// How the verdict was inferred, when not read directly from the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// The underlying query failure, for verdicts derived from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityVerdict {
    /// A bare verdict with no metadata.
    pub fn new(status: Availability) -> Self {
        Self {
            available: status.as_option(),
            status,
            registrar: None,
            created_date: None,
            expiry_date: None,
            raw_snippet: None,
            note: None,
            error: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == Availability::Available
    }
}

/// A price amount or the "unknown" sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Amount(f64),
    Unknown,
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Amount(amount) => serializer.serialize_f64(*amount),
            Price::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "${:.2}", amount),
            Price::Unknown => write!(f, "unknown"),
        }
    }
}

/// Registration and renewal price for a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub registration: Price,
    pub renewal: Price,
}

impl PriceEstimate {
    pub fn new(registration: f64, renewal: f64) -> Self {
        Self {
            registration: Price::Amount(registration),
            renewal: Price::Amount(renewal),
        }
    }

    pub fn unknown() -> Self {
        Self {
            registration: Price::Unknown,
            renewal: Price::Unknown,
        }
    }
}

/// One checked domain: the query, its verdict and (when available) pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainReport {
    pub domain: String,

    #[serde(flatten)]
    pub verdict: AvailabilityVerdict,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceEstimate>,
}

/// Ordered results of a batch plus derived counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub results: Vec<DomainReport>,
    pub available_count: usize,
    pub total_count: usize,
    pub summary: String,
}

impl BatchResult {
    /// Derive counters and the summary line from ordered reports.
    pub fn from_reports(results: Vec<DomainReport>) -> Self {
        let available: Vec<&str> = results
            .iter()
            .filter(|r| r.verdict.is_available())
            .map(|r| r.domain.as_str())
            .collect();

        let summary = if available.is_empty() {
            "None available".to_string()
        } else {
            available.join(", ")
        };

        Self {
            available_count: available.len(),
            total_count: results.len(),
            summary,
            results,
        }
    }
}

/// Settings for a [`DomainChecker`](crate::DomainChecker) and its WHOIS client.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Upper bound on one whole lookup, referrals included.
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Suffixes used when a caller asks for a multi-TLD check without naming any
    pub default_tlds: Vec<String>,

    /// How many `Registrar WHOIS Server:` referrals to follow.
    /// Default: 1
    pub follow_referrals: usize,

    /// Send every query to this `host[:port]` instead of the per-TLD server
    pub whois_server: Option<String>,

    /// Suffix → price table
    pub pricing: PricingTable,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            default_tlds: DEFAULT_TLDS.iter().map(|t| t.to_string()).collect(),
            follow_referrals: 1,
            whois_server: None,
            pricing: PricingTable::default(),
        }
    }
}

impl CheckConfig {
    /// Set the lookup timeout. A zero timeout is raised to one millisecond.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_millis(1));
        self
    }

    pub fn with_default_tlds(mut self, tlds: Vec<String>) -> Self {
        self.default_tlds = tlds;
        self
    }

    pub fn with_follow_referrals(mut self, hops: usize) -> Self {
        self.follow_referrals = hops;
        self
    }

    pub fn with_whois_server<S: Into<String>>(mut self, server: S) -> Self {
        self.whois_server = Some(server.into());
        self
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }
}
