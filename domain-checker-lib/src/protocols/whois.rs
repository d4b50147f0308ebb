//! WHOIS protocol client.
//!
//! Queries go straight to the registry over TCP port 43 (`<domain>\r\n`,
//! response read to EOF). Thin registries such as Verisign name the
//! registrar's own WHOIS server in their response; those referrals are
//! followed up to a configurable depth.
//!
//! Every failure is returned as [`WhoisOutcome::QueryFailure`] carrying the
//! error text. Nothing here returns an error to the caller: whether a failed
//! query means "available" is the classifier's decision.

use crate::error::DomainCheckError;
use crate::types::{CheckConfig, WhoisOutcome};
use crate::utils::extract_suffix;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Standard WHOIS port.
pub const WHOIS_PORT: u16 = 43;

/// Where unknown TLDs are resolved to their registry's WHOIS server.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Responses larger than this are cut off; registries never legitimately send this much.
const MAX_RESPONSE_BYTES: u64 = 1024 * 1024;

/// Anything that can answer a WHOIS query for one domain.
///
/// Implementations must bound the lookup in time and report every failure as
/// [`WhoisOutcome::QueryFailure`].
pub trait WhoisLookup: Send + Sync {
    fn lookup(&self, domain: &str) -> impl Future<Output = WhoisOutcome> + Send;
}

/// WHOIS client that talks TCP port 43 directly.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Bound on the whole lookup, referrals included
    timeout: Duration,
    /// Registrar referrals to follow after the registry answer
    follow_referrals: usize,
    /// Fixed `host[:port]` that receives every first query
    server_override: Option<String>,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self::from_config(&CheckConfig::default())
    }

    /// Create a client from the lookup-related parts of a [`CheckConfig`].
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            timeout: config.timeout,
            follow_referrals: config.follow_referrals,
            server_override: config.whois_server.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query `domain` and return the final response text.
    ///
    /// Unlike [`WhoisLookup::lookup`] this is not time-bounded on its own.
    pub async fn query(&self, domain: &str) -> Result<String, DomainCheckError> {
        let server = self.resolve_server(domain).await?;
        let mut text = query_server(&server, domain).await?;
        let mut current = server;

        for _ in 0..self.follow_referrals {
            let Some(referral) = parse_referral(&text) else {
                break;
            };
            if referral.eq_ignore_ascii_case(&current) {
                break;
            }

            match query_server(&referral, domain).await {
                Ok(referred) if !referred.trim().is_empty() => {
                    tracing::debug!(domain = %domain, server = %referral, "Followed WHOIS referral");
                    text = referred;
                    current = referral;
                }
                Ok(_) => break,
                Err(e) => {
                    tracing::debug!(
                        domain = %domain,
                        server = %referral,
                        error = %e,
                        "WHOIS referral failed, keeping registry response"
                    );
                    break;
                }
            }
        }

        Ok(text)
    }

    /// Pick the server for the first query: the override, the built-in
    /// table, or an IANA referral for the suffix.
    async fn resolve_server(&self, domain: &str) -> Result<String, DomainCheckError> {
        if let Some(server) = &self.server_override {
            return Ok(server.clone());
        }

        let tld = extract_suffix(domain).to_lowercase();
        if let Some(server) = known_whois_server(&tld) {
            return Ok(server.to_string());
        }

        let response = query_server(IANA_WHOIS_SERVER, &tld).await?;
        parse_iana_refer_response(&response).ok_or_else(|| {
            DomainCheckError::whois(domain, format!("No WHOIS server is known for .{}", tld))
        })
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> WhoisOutcome {
        tracing::debug!(domain = %domain, "WHOIS lookup");

        match tokio::time::timeout(self.timeout, self.query(domain)).await {
            Ok(Ok(text)) => WhoisOutcome::RawText(text),
            Ok(Err(e)) => WhoisOutcome::failure(e.to_string()),
            Err(_) => WhoisOutcome::failure(
                DomainCheckError::timeout("WHOIS query", self.timeout).to_string(),
            ),
        }
    }
}

/// Built-in WHOIS servers for commonly checked suffixes.
pub fn known_whois_server(tld: &str) -> Option<&'static str> {
    let server = match tld {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.pir.org",
        "io" => "whois.nic.io",
        "ai" => "whois.nic.ai",
        "cloud" => "whois.nic.cloud",
        "dev" | "app" => "whois.nic.google",
        "tech" => "whois.nic.tech",
        "co" => "whois.nic.co",
        "xyz" => "whois.nic.xyz",
        "me" => "whois.nic.me",
        "info" => "whois.nic.info",
        "uk" => "whois.nic.uk",
        "de" => "whois.denic.de",
        _ => return None,
    };
    Some(server)
}

/// Send one query to `server` (`host` or `host:port`) and read the reply.
async fn query_server(server: &str, query: &str) -> Result<String, DomainCheckError> {
    let addr = server_address(server);

    let mut stream = TcpStream::connect(&addr).await.map_err(|e| {
        DomainCheckError::whois(query, format!("failed to connect to {}: {}", addr, e))
    })?;

    stream
        .write_all(format!("{}\r\n", query).as_bytes())
        .await
        .map_err(|e| DomainCheckError::whois(query, format!("failed to send query to {}: {}", addr, e)))?;

    let mut buf = Vec::new();
    stream
        .take(MAX_RESPONSE_BYTES)
        .read_to_end(&mut buf)
        .await
        .map_err(|e| DomainCheckError::whois(query, format!("failed to read from {}: {}", addr, e)))?;

    if buf.is_empty() {
        return Err(DomainCheckError::whois(
            query,
            format!("empty response from {}", addr),
        ));
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `host` → `host:43`; `host:port` is kept.
fn server_address(server: &str) -> String {
    let server = server.trim();
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, WHOIS_PORT)
    }
}

/// Registrar WHOIS server named in a registry response, if any.
///
/// ```text
/// Registrar WHOIS Server: whois.markmonitor.com
/// ReferralServer: whois://whois.arin.net
/// ```
fn parse_referral(response: &str) -> Option<String> {
    for line in response.lines() {
        let Some((label, value)) = line.trim().split_once(':') else {
            continue;
        };

        let label = label.trim().to_lowercase();
        if label != "registrar whois server" && label != "referralserver" {
            continue;
        }

        let value = value.trim();
        let value = value.strip_prefix("whois://").unwrap_or(value);
        let value = value.trim_end_matches('/');
        if !value.is_empty() && !value.contains("://") {
            return Some(value.to_string());
        }
    }

    None
}

/// Parse an IANA WHOIS response for the authoritative WHOIS server.
///
/// IANA uses either `refer:` or `whois:` for the server; `refer:` wins when
/// both are present.
///
/// ```text
/// whois:        whois.verisign-grs.com
/// refer:        whois.verisign-grs.com
/// ```
fn parse_iana_refer_response(response: &str) -> Option<String> {
    let mut whois_server = None;

    for line in response.lines() {
        let line_trimmed = line.trim();
        if let Some(server) = line_trimmed.strip_prefix("refer:") {
            let server = server.trim();
            if !server.is_empty() {
                return Some(server.to_string());
            }
        } else if let Some(server) = line_trimmed.strip_prefix("whois:") {
            let server = server.trim();
            if !server.is_empty() {
                whois_server = Some(server.to_string());
            }
        }
    }

    whois_server
}
