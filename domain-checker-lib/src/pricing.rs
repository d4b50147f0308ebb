//! Static registration/renewal price estimates keyed by suffix.

use crate::error::DomainCheckError;
use crate::types::PriceEstimate;
use crate::utils::extract_suffix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the pricing table, as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    pub registration: f64,
    pub renewal: f64,
}

/// Suffix → price table. Keys are stored lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    prices: HashMap<String, PricePair>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let defaults = [
            ("com", 8.88, 13.98),
            ("io", 39.98, 49.98),
            ("ai", 89.98, 99.98),
            ("cloud", 4.88, 14.98),
            ("dev", 12.98, 17.98),
            ("app", 14.98, 19.98),
            ("tech", 5.88, 54.98),
            ("co", 9.98, 32.98),
            ("net", 12.98, 16.98),
            ("org", 12.98, 16.98),
            ("xyz", 1.00, 13.98),
        ];

        Self {
            prices: defaults
                .iter()
                .map(|(tld, registration, renewal)| {
                    (
                        tld.to_string(),
                        PricePair {
                            registration: *registration,
                            renewal: *renewal,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl PricingTable {
    /// A table with no entries; every estimate is unknown.
    pub fn empty() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// Add or replace the prices for one suffix.
    pub fn insert(&mut self, tld: &str, pair: PricePair) {
        self.prices.insert(normalize_tld(tld), pair);
    }

    /// Overlay entries from a config section onto this table.
    pub fn extend(&mut self, overrides: &HashMap<String, PricePair>) {
        for (tld, pair) in overrides {
            self.insert(tld, *pair);
        }
    }

    pub fn get(&self, tld: &str) -> Option<PricePair> {
        self.prices.get(&normalize_tld(tld)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Estimate prices for a domain from its suffix (text after the last `.`).
    ///
    /// Never fails; unmapped suffixes yield `{unknown, unknown}`.
    pub fn estimate(&self, domain: &str) -> PriceEstimate {
        match self.get(extract_suffix(domain)) {
            Some(pair) => PriceEstimate::new(pair.registration, pair.renewal),
            None => PriceEstimate::unknown(),
        }
    }
}

/// Check that a price table section is usable.
pub(crate) fn validate_prices(prices: &HashMap<String, PricePair>) -> Result<(), DomainCheckError> {
    for (tld, pair) in prices {
        let tld_clean = tld.trim();
        if tld_clean.is_empty() || tld_clean.contains('.') || tld_clean.contains(' ') {
            return Err(DomainCheckError::config(format!(
                "Invalid TLD '{}' in pricing table",
                tld
            )));
        }

        for (label, value) in [("registration", pair.registration), ("renewal", pair.renewal)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainCheckError::config(format!(
                    "Invalid {} price {} for '{}'",
                    label, value, tld
                )));
            }
        }
    }

    Ok(())
}

fn normalize_tld(tld: &str) -> String {
    tld.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Price;

    #[test]
    fn test_known_suffix() {
        let table = PricingTable::default();
        assert_eq!(table.estimate("example.com"), PriceEstimate::new(8.88, 13.98));
        assert_eq!(table.estimate("welkin.ai"), PriceEstimate::new(89.98, 99.98));
        assert_eq!(table.estimate("cheap.xyz"), PriceEstimate::new(1.00, 13.98));
    }

    #[test]
    fn test_unknown_suffix() {
        let table = PricingTable::default();
        let estimate = table.estimate("example.zzz");
        assert_eq!(estimate.registration, Price::Unknown);
        assert_eq!(estimate.renewal, Price::Unknown);
    }

    #[test]
    fn test_suffix_is_last_label_and_case_insensitive() {
        let table = PricingTable::default();
        assert_eq!(table.estimate("Example.COM"), PriceEstimate::new(8.88, 13.98));
        // Only the last label counts: co.uk is not priced as .co
        assert_eq!(table.estimate("example.co.uk"), PriceEstimate::unknown());
        assert_eq!(table.estimate("example.uk.co"), PriceEstimate::new(9.98, 32.98));
    }

    #[test]
    fn test_default_table_covers_default_tlds() {
        let table = PricingTable::default();
        assert_eq!(table.len(), 11);
        for tld in crate::types::DEFAULT_TLDS {
            assert!(table.get(tld).is_some(), "missing price for {}", tld);
        }
    }

    #[test]
    fn test_overrides() {
        let mut table = PricingTable::default();
        let mut overrides = HashMap::new();
        overrides.insert(
            ".COM".to_string(),
            PricePair {
                registration: 10.0,
                renewal: 12.0,
            },
        );
        overrides.insert(
            "me".to_string(),
            PricePair {
                registration: 2.5,
                renewal: 20.0,
            },
        );
        table.extend(&overrides);

        assert_eq!(table.estimate("x.com"), PriceEstimate::new(10.0, 12.0));
        assert_eq!(table.estimate("x.me"), PriceEstimate::new(2.5, 20.0));
        assert_eq!(table.len(), 12);
    }

    #[test]
    fn test_empty_table() {
        let table = PricingTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.estimate("example.com"), PriceEstimate::unknown());
    }

    #[test]
    fn test_validate_prices() {
        let mut prices = HashMap::new();
        prices.insert(
            "com".to_string(),
            PricePair {
                registration: 1.0,
                renewal: 2.0,
            },
        );
        assert!(validate_prices(&prices).is_ok());

        prices.insert(
            "net".to_string(),
            PricePair {
                registration: -1.0,
                renewal: 2.0,
            },
        );
        assert!(validate_prices(&prices).is_err());

        let mut bad_tld = HashMap::new();
        bad_tld.insert(
            "co.uk".to_string(),
            PricePair {
                registration: 1.0,
                renewal: 2.0,
            },
        );
        assert!(validate_prices(&bad_tld).is_err());
    }
}
