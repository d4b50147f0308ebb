//! # Domain Checker Library
//!
//! WHOIS-based domain availability checking with heuristic response
//! classification, static price estimates and concurrent batch checks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_checker_lib::{DomainChecker, DomainQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = DomainChecker::new();
//!     let report = checker.check_domain(&DomainQuery::parse("example.com")?).await;
//!
//!     println!("{} - {}", report.domain, report.verdict.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **WHOIS over TCP/43**: built-in server table, IANA discovery for other
//!   suffixes, optional registrar referral following
//! - **Classification**: availability phrases, registrar and date extraction
//! - **Batch checks**: concurrent fan-out with results in input order
//! - **Tool surface**: four named JSON operations for protocol front ends
//! - **Configurable**: TOML files and `DC_*` environment variables

pub use checker::DomainChecker;
pub use classifier::{classify, classify_failure, classify_text, is_transient_failure};
pub use config::{
    load_env_config, resolve_check_config, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::DomainCheckError;
pub use pricing::{PricePair, PricingTable};
pub use protocols::{known_whois_server, WhoisClient, WhoisLookup};
pub use tools::{tool_definitions, ToolDefinition, ToolName, ToolResponse, ToolSurface};
pub use types::{
    Availability, AvailabilityVerdict, BatchResult, CheckConfig, DomainQuery, DomainReport, Price,
    PriceEstimate, WhoisOutcome, DEFAULT_TLDS,
};
pub use utils::{expand_domain_inputs, parse_timeout_string, parse_tld_list};

mod checker;
mod classifier;
mod config;
mod error;
mod pricing;
mod protocols;
mod tools;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainCheckError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
