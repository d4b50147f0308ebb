//! Main domain checker implementation.
//!
//! `DomainChecker` ties the WHOIS lookup, the classifier and the pricing
//! table together, and fans batches out concurrently.

use crate::classifier::classify;
use crate::error::DomainCheckError;
use crate::pricing::PricingTable;
use crate::protocols::{WhoisClient, WhoisLookup};
use crate::types::{
    Availability, AvailabilityVerdict, BatchResult, CheckConfig, DomainQuery, DomainReport,
};
use futures::future::join_all;

/// Main domain checker that coordinates availability checking operations.
///
/// # Example
///
/// ```rust,no_run
/// use domain_checker_lib::DomainChecker;
///
/// #[tokio::main]
/// async fn main() {
///     let checker = DomainChecker::new();
///     let batch = checker
///         .check_suffixes("culmina", &["com".to_string(), "io".to_string()])
///         .await;
///     println!("{}", batch.summary);
/// }
/// ```
pub struct DomainChecker<L = WhoisClient> {
    config: CheckConfig,
    lookup: L,
}

impl DomainChecker<WhoisClient> {
    /// Create a new domain checker with default configuration.
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a new domain checker with custom configuration.
    ///
    /// ```rust
    /// use domain_checker_lib::{CheckConfig, DomainChecker};
    /// use std::time::Duration;
    ///
    /// let config = CheckConfig::default()
    ///     .with_timeout(Duration::from_secs(5))
    ///     .with_follow_referrals(0);
    ///
    /// let checker = DomainChecker::with_config(config);
    /// ```
    pub fn with_config(config: CheckConfig) -> Self {
        let lookup = WhoisClient::from_config(&config);
        Self { config, lookup }
    }
}

impl Default for DomainChecker<WhoisClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: WhoisLookup> DomainChecker<L> {
    /// Create a checker around any WHOIS lookup implementation.
    pub fn with_lookup(config: CheckConfig, lookup: L) -> Self {
        Self { config, lookup }
    }

    /// Get the current configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// The underlying WHOIS lookup.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.config.pricing
    }

    /// Look up and classify one domain.
    ///
    /// Pricing is attached only when the verdict is `Available`.
    pub async fn check_domain(&self, domain: &DomainQuery) -> DomainReport {
        let outcome = self.lookup.lookup(domain.as_str()).await;
        let verdict = classify(domain.as_str(), &outcome);

        let pricing = if verdict.is_available() {
            Some(self.config.pricing.estimate(domain.as_str()))
        } else {
            None
        };

        tracing::debug!(domain = %domain, status = %verdict.status, "Domain check completed");

        DomainReport {
            domain: domain.to_string(),
            verdict,
            pricing,
        }
    }

    /// Check `base_name` under every suffix, concurrently, in suffix order.
    pub async fn check_suffixes(&self, base_name: &str, suffixes: &[String]) -> BatchResult {
        let slots = suffixes
            .iter()
            .map(|suffix| {
                DomainQuery::from_parts(base_name, suffix)
                    .map_err(|e| (format!("{}.{}", base_name.trim(), suffix.trim()), e))
            })
            .collect();

        self.run_batch(slots).await
    }

    /// Check arbitrary full domains, concurrently, in input order.
    pub async fn check_many(&self, domains: &[String]) -> BatchResult {
        let slots = domains
            .iter()
            .map(|domain| DomainQuery::parse(domain).map_err(|e| (domain.trim().to_string(), e)))
            .collect();

        self.run_batch(slots).await
    }

    /// Launch every valid slot's check, then await them together.
    ///
    /// `join_all` yields outputs by position, so result order is input order
    /// whatever order the lookups finish in. Invalid slots never reach the
    /// network.
    async fn run_batch(
        &self,
        slots: Vec<Result<DomainQuery, (String, DomainCheckError)>>,
    ) -> BatchResult {
        tracing::debug!(count = slots.len(), "Starting batch");

        let checks = slots.iter().map(|slot| async move {
            match slot {
                Ok(query) => self.check_domain(query).await,
                Err((raw, error)) => invalid_report(raw, error),
            }
        });

        let results = join_all(checks).await;
        BatchResult::from_reports(results)
    }
}

fn invalid_report(raw: &str, error: &DomainCheckError) -> DomainReport {
    let mut verdict = AvailabilityVerdict::new(Availability::Unknown);
    verdict.note = Some("not checked: invalid domain".to_string());
    verdict.error = Some(error.to_string());

    DomainReport {
        domain: raw.to_string(),
        verdict,
        pricing: None,
    }
}
