//! Protocol implementations for domain checking.

/// WHOIS protocol implementation
pub mod whois;

pub use whois::{known_whois_server, WhoisClient, WhoisLookup};
