//! Named request/response operations over the checker.
//!
//! [`ToolSurface::call`] takes an operation name and a JSON argument object
//! and always returns a [`ToolResponse`]: bad input, unknown operations and
//! internal faults (panics included) come back as structured errors rather
//! than propagating to the host process.

use crate::checker::DomainChecker;
use crate::error::DomainCheckError;
use crate::protocols::{WhoisClient, WhoisLookup};
use crate::types::DomainQuery;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;

/// The operations exposed by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    CheckDomain,
    CheckMultipleTlds,
    CheckWithPricing,
    BulkCheck,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::CheckDomain,
        ToolName::CheckMultipleTlds,
        ToolName::CheckWithPricing,
        ToolName::BulkCheck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CheckDomain => "check_domain",
            ToolName::CheckMultipleTlds => "check_multiple_tlds",
            ToolName::CheckWithPricing => "check_with_pricing",
            ToolName::BulkCheck => "bulk_check",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| DomainCheckError::unknown_operation(s))
    }
}

/// Result of one operation: pretty-printed JSON plus an error flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub text: String,
    pub is_error: bool,
}

impl ToolResponse {
    fn success(value: &Value) -> Self {
        Self {
            text: pretty(value),
            is_error: false,
        }
    }

    fn error(operation: &str, message: &str) -> Self {
        Self {
            text: pretty(&json!({ "error": message, "operation": operation })),
            is_error: true,
        }
    }

    /// Parse the response text back into JSON.
    pub fn json(&self) -> Result<Value, DomainCheckError> {
        Ok(serde_json::from_str(&self.text)?)
    }
}

/// Name, description and JSON input schema of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Describe every operation for transport discovery.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let domain_schema = || {
        json!({
            "type": "object",
            "properties": {
                "domain": {
                    "type": "string",
                    "description": "Full domain to check (e.g. culmina.com)"
                }
            },
            "required": ["domain"]
        })
    };

    vec![
        ToolDefinition {
            name: ToolName::CheckDomain.as_str(),
            description: "Check if a single domain is available for registration",
            input_schema: domain_schema(),
        },
        ToolDefinition {
            name: ToolName::CheckMultipleTlds.as_str(),
            description: "Check a base name across multiple TLDs at once",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "baseName": {
                        "type": "string",
                        "description": "Name without suffix (e.g. culmina)"
                    },
                    "tlds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Suffixes to check; defaults to the configured list"
                    }
                },
                "required": ["baseName"]
            }),
        },
        ToolDefinition {
            name: ToolName::CheckWithPricing.as_str(),
            description: "Check domain availability and include estimated registration and renewal pricing. \
                          Pricing is only attached when the domain is available",
            input_schema: domain_schema(),
        },
        ToolDefinition {
            name: ToolName::BulkCheck.as_str(),
            description: "Check a list of full domains at once",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "domains": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Full domains to check"
                    }
                },
                "required": ["domains"]
            }),
        },
    ]
}

#[derive(Debug, Default, Deserialize)]
struct DomainArgs {
    domain: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MultipleTldsArgs {
    #[serde(rename = "baseName")]
    base_name: Option<String>,
    tlds: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct BulkArgs {
    domains: Option<Vec<String>>,
}

/// Dispatches named operations to a [`DomainChecker`].
pub struct ToolSurface<L = WhoisClient> {
    checker: DomainChecker<L>,
}

impl<L: WhoisLookup> ToolSurface<L> {
    pub fn new(checker: DomainChecker<L>) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &DomainChecker<L> {
        &self.checker
    }

    /// Run the operation `name` with `arguments`.
    ///
    /// Never panics and never returns `Err`: every failure is folded into an
    /// error response.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolResponse {
        tracing::debug!(tool = name, "Tool call");

        match AssertUnwindSafe(self.dispatch(name, arguments))
            .catch_unwind()
            .await
        {
            Ok(Ok(value)) => ToolResponse::success(&value),
            Ok(Err(e)) => {
                if e.is_client_error() {
                    tracing::debug!(tool = name, error = %e, "Rejected tool call");
                } else {
                    tracing::warn!(tool = name, error = %e, "Tool call failed");
                }
                ToolResponse::error(e.operation().unwrap_or(name), &e.to_string())
            }
            Err(panic) => {
                let e = DomainCheckError::internal(panic_message(panic.as_ref()));
                tracing::error!(tool = name, error = %e, "Tool call panicked");
                ToolResponse::error(name, &e.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: &Value) -> Result<Value, DomainCheckError> {
        let tool: ToolName = name.parse()?;

        match tool {
            ToolName::CheckDomain | ToolName::CheckWithPricing => {
                let args: DomainArgs = parse_args(tool, arguments)?;
                let domain = required(tool, "domain", args.domain)?;
                let query = DomainQuery::parse(&domain)?;

                let report = self.checker.check_domain(&query).await;
                Ok(serde_json::to_value(report)?)
            }
            ToolName::CheckMultipleTlds => {
                let args: MultipleTldsArgs = parse_args(tool, arguments)?;
                let base_name = required(tool, "baseName", args.base_name)?;
                let tlds = args
                    .tlds
                    .unwrap_or_else(|| self.checker.config().default_tlds.clone());

                let batch = self.checker.check_suffixes(&base_name, &tlds).await;
                Ok(json!({
                    "baseName": base_name,
                    "tlds": batch.results,
                    "availableCount": batch.available_count,
                    "totalCount": batch.total_count,
                    "summary": batch.summary,
                }))
            }
            ToolName::BulkCheck => {
                let args: BulkArgs = parse_args(tool, arguments)?;
                let domains = required(tool, "domains", args.domains)?;

                let batch = self.checker.check_many(&domains).await;
                Ok(json!({
                    "total": batch.total_count,
                    "available": batch.available_count,
                    "results": batch.results,
                }))
            }
        }
    }
}

/// Deserialize an argument object; `null` counts as `{}`.
fn parse_args<T>(tool: ToolName, arguments: &Value) -> Result<T, DomainCheckError>
where
    T: DeserializeOwned + Default,
{
    match arguments {
        Value::Null => Ok(T::default()),
        Value::Object(_) => T::deserialize(arguments)
            .map_err(|e| DomainCheckError::invalid_arguments(tool.as_str(), e.to_string())),
        _ => Err(DomainCheckError::invalid_arguments(
            tool.as_str(),
            "Arguments must be a JSON object",
        )),
    }
}

fn required<T>(tool: ToolName, field: &str, value: Option<T>) -> Result<T, DomainCheckError> {
    value.ok_or_else(|| {
        DomainCheckError::invalid_arguments(
            tool.as_str(),
            format!("Missing required field '{}'", field),
        )
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("operation panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("operation panicked: {}", s)
    } else {
        "operation panicked".to_string()
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckConfig, WhoisOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers "no match" for anything containing "free", registered otherwise.
    struct StubLookup {
        calls: AtomicUsize,
    }

    impl WhoisLookup for StubLookup {
        async fn lookup(&self, domain: &str) -> WhoisOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if domain.starts_with("panic.") {
                panic!("lookup exploded");
            }
            if domain.contains("free") {
                WhoisOutcome::RawText(format!("No match for domain {}", domain))
            } else {
                WhoisOutcome::RawText("Registrar: Example Corp\n".to_string())
            }
        }
    }

    fn surface() -> ToolSurface<StubLookup> {
        let lookup = StubLookup {
            calls: AtomicUsize::new(0),
        };
        ToolSurface::new(DomainChecker::with_lookup(CheckConfig::default(), lookup))
    }

    fn lookups(surface: &ToolSurface<StubLookup>) -> usize {
        surface.checker().lookup().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_tool_name_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
        assert!("check_everything".parse::<ToolName>().is_err());
    }

    #[test]
    fn test_tool_definitions() {
        let defs = tool_definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["check_domain", "check_multiple_tlds", "check_with_pricing", "bulk_check"]
        );
        assert_eq!(defs[1].input_schema["required"], json!(["baseName"]));
        assert!(defs[2].description.contains("only attached when the domain is available"));
        assert_eq!(defs[3].input_schema["required"], json!(["domains"]));
    }

    #[tokio::test]
    async fn test_check_domain() {
        let surface = surface();
        let response = surface
            .call("check_domain", &json!({ "domain": "free.com" }))
            .await;

        assert!(!response.is_error);
        let value = response.json().unwrap();
        assert_eq!(value["domain"], "free.com");
        assert_eq!(value["available"], true);
        assert_eq!(value["pricing"]["registration"], 8.88);
    }

    #[tokio::test]
    async fn test_check_with_pricing_matches_check_domain() {
        let surface = surface();
        let args = json!({ "domain": "taken.io" });

        let a = surface.call("check_domain", &args).await;
        let b = surface.call("check_with_pricing", &args).await;

        assert_eq!(a, b);
        let value = b.json().unwrap();
        assert_eq!(value["status"], "registered");
        assert!(value.get("pricing").is_none());
    }

    #[tokio::test]
    async fn test_multiple_tlds_defaults_and_shape() {
        let surface = surface();
        let response = surface
            .call("check_multiple_tlds", &json!({ "baseName": "free" }))
            .await;

        let value = response.json().unwrap();
        assert_eq!(value["baseName"], "free");
        assert_eq!(value["tlds"].as_array().unwrap().len(), 11);
        assert_eq!(value["tlds"][0]["domain"], "free.com");
        assert_eq!(value["tlds"][10]["domain"], "free.xyz");
        assert_eq!(value["availableCount"], 11);
        assert_eq!(value["totalCount"], 11);
    }

    #[tokio::test]
    async fn test_bulk_check_shape() {
        let surface = surface();
        let response = surface
            .call(
                "bulk_check",
                &json!({ "domains": ["free.com", "taken.com", "nodot"] }),
            )
            .await;

        let value = response.json().unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["available"], 1);
        assert_eq!(value["results"][1]["available"], false);
        assert!(value["results"][2]["available"].is_null());
        assert_eq!(lookups(&surface), 2);
    }

    #[tokio::test]
    async fn test_missing_fields_are_client_errors() {
        let surface = surface();

        for (tool, field) in [
            ("check_domain", "domain"),
            ("check_with_pricing", "domain"),
            ("check_multiple_tlds", "baseName"),
            ("bulk_check", "domains"),
        ] {
            let response = surface.call(tool, &json!({})).await;
            assert!(response.is_error);
            let value = response.json().unwrap();
            assert_eq!(value["operation"], tool);
            assert!(
                value["error"]
                    .as_str()
                    .unwrap()
                    .contains(&format!("Missing required field '{}'", field)),
                "{}",
                response.text
            );
        }

        assert_eq!(lookups(&surface), 0);
    }

    #[tokio::test]
    async fn test_ill_typed_and_invalid_arguments() {
        let surface = surface();

        let wrong_type = surface.call("bulk_check", &json!({ "domains": "a.com" })).await;
        assert!(wrong_type.is_error);

        let not_object = surface.call("check_domain", &json!(["a.com"])).await;
        assert!(not_object.is_error);

        let no_suffix = surface.call("check_domain", &json!({ "domain": "culmina" })).await;
        assert!(no_suffix.is_error);
        assert!(no_suffix.text.contains("Invalid domain"));

        let null_args = surface.call("check_domain", &Value::Null).await;
        assert!(null_args.is_error);

        assert_eq!(lookups(&surface), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let surface = surface();
        let response = surface.call("register_domain", &json!({})).await;

        assert!(response.is_error);
        let value = response.json().unwrap();
        assert_eq!(value["error"], "Unknown tool: register_domain");
        assert_eq!(value["operation"], "register_domain");
    }

    #[tokio::test]
    async fn test_panic_becomes_error_response() {
        let surface = surface();
        let response = surface
            .call("check_domain", &json!({ "domain": "panic.com" }))
            .await;

        assert!(response.is_error);
        assert!(response.text.contains("lookup exploded"));

        // the surface keeps working afterwards
        let next = surface
            .call("check_domain", &json!({ "domain": "free.dev" }))
            .await;
        assert!(!next.is_error);
    }
}
