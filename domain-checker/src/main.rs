//! Domain Checker CLI Application
//!
//! A command-line interface for checking domain availability over WHOIS.
//! This CLI application provides a user-friendly interface to the
//! domain-checker-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_checker_lib::{
    expand_domain_inputs, parse_timeout_string, resolve_check_config, Availability, BatchResult,
    CheckConfig, DomainChecker,
};
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-checker
#[derive(Parser, Debug)]
#[command(name = "domain-checker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain availability over WHOIS with price estimates")]
#[command(
    long_about = "Check domain availability by querying registry WHOIS servers directly.\n\nBase names are expanded across the configured TLDs, full domains are checked as-is, and every check in a run happens concurrently."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check (base names or FQDNs)
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// TLDs to check (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub tlds: Option<Vec<String>>,

    /// Input file with domains (one per line, # comments allowed)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Show registrar and dates for taken domains
    #[arg(short = 'i', long = "info", help_heading = "Output Format")]
    pub info: bool,

    /// Per-domain lookup timeout (e.g. 5s, 30s, 2m)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Protocol")]
    pub timeout: Option<String>,

    /// Registrar WHOIS referrals to follow (0 disables)
    #[arg(long = "follow-referrals", value_name = "N", help_heading = "Protocol")]
    pub follow_referrals: Option<usize>,

    /// Send every query to this WHOIS server (host or host:port)
    #[arg(long = "whois-server", value_name = "HOST", help_heading = "Protocol")]
    pub whois_server: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging on stderr
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(args.verbose);

    if let Err(e) = run_domain_check(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_args(args: &Args) -> Result<(), String> {
    if args.domains.is_empty() && args.file.is_none() {
        return Err("You must specify domain names or a file with --file".to_string());
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if let Some(tlds) = &args.tlds {
        if tlds.iter().all(|t| t.trim().trim_start_matches('.').is_empty()) {
            return Err("TLD list cannot be empty".to_string());
        }
    }

    Ok(())
}

async fn run_domain_check(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let domains = get_domains_to_check(&args, &config)?;

    if domains.is_empty() {
        return Err("No domains to check".into());
    }

    tracing::info!(count = domains.len(), "Checking domains");

    let checker = DomainChecker::with_config(config);
    let start = Instant::now();
    let batch = checker.check_many(&domains).await;

    tracing::info!(
        available = batch.available_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch finished"
    );

    display_results(&batch, &args, start.elapsed())
}

/// Files and environment first, then CLI flags on top.
fn build_config(args: &Args) -> Result<CheckConfig, Box<dyn std::error::Error>> {
    let mut config = resolve_check_config(args.config.as_deref().map(Path::new))?;

    if let Some(tlds) = &args.tlds {
        config = config.with_default_tlds(
            tlds.iter()
                .map(|t| t.trim().trim_start_matches('.').to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        );
    }

    if let Some(timeout_str) = &args.timeout {
        let timeout = parse_timeout_string(timeout_str)
            .ok_or_else(|| format!("Invalid timeout '{}'", timeout_str))?;
        config = config.with_timeout(timeout);
    }

    if let Some(hops) = args.follow_referrals {
        config = config.with_follow_referrals(hops);
    }

    if let Some(server) = &args.whois_server {
        config = config.with_whois_server(server.trim());
    }

    Ok(config)
}

fn get_domains_to_check(
    args: &Args,
    config: &CheckConfig,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut inputs = args.domains.clone();

    if let Some(file_path) = &args.file {
        inputs.extend(read_domains_from_file(file_path)?);
    }

    Ok(expand_domain_inputs(&inputs, &config.default_tlds))
}

fn read_domains_from_file(file_path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {}", file_path).into());
    }

    let content = std::fs::read_to_string(path)?;
    let domains = parse_domain_lines(&content);

    if domains.is_empty() {
        return Err("No valid domains found in the file.".into());
    }

    Ok(domains)
}

/// One name per line; blank lines and `#` comments (whole-line or inline) are dropped.
fn parse_domain_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let domain_part = line.split('#').next().unwrap_or("").trim();
            if domain_part.is_empty() {
                None
            } else {
                Some(domain_part.to_string())
            }
        })
        .collect()
}

fn display_results(
    batch: &BatchResult,
    args: &Args,
    duration: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_output(batch))?);
        return Ok(());
    }

    for report in &batch.results {
        ui::print_result(report, args.info);
    }

    if batch.total_count > 1 {
        let count = |status: Availability| {
            batch
                .results
                .iter()
                .filter(|r| r.verdict.status == status)
                .count()
        };
        println!();
        ui::print_summary(
            batch.total_count,
            count(Availability::Available),
            count(Availability::Registered),
            count(Availability::Unknown),
            duration,
        );
    }

    Ok(())
}

/// Same shape as the `bulk_check` tool response.
fn json_output(batch: &BatchResult) -> serde_json::Value {
    serde_json::json!({
        "total": batch.total_count,
        "available": batch.available_count,
        "results": batch.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_checker_lib::{AvailabilityVerdict, DomainReport, PriceEstimate};

    fn create_test_args() -> Args {
        Args {
            domains: vec![],
            tlds: None,
            file: None,
            json: false,
            info: false,
            timeout: None,
            follow_referrals: None,
            whois_server: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_requires_input() {
        let args = create_test_args();
        assert!(validate_args(&args).is_err());

        let args = Args {
            domains: vec!["culmina".to_string()],
            ..create_test_args()
        };
        assert!(validate_args(&args).is_ok());

        let args = Args {
            file: Some("names.txt".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_bad_timeout() {
        let args = Args {
            domains: vec!["culmina".to_string()],
            timeout: Some("eventually".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).unwrap_err().contains("Invalid timeout"));
    }

    #[test]
    fn test_validate_args_rejects_empty_tld_list() {
        let args = Args {
            domains: vec!["culmina".to_string()],
            tlds: Some(vec![" ".to_string(), ".".to_string()]),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_parse_domain_lines() {
        let content = "# startup names\nculmina\n\nwelkin.io  # maybe\n   \n#skip.com\nexample.com\n";
        assert_eq!(
            parse_domain_lines(content),
            vec!["culmina", "welkin.io", "example.com"]
        );
    }

    #[test]
    fn test_base_names_expand_with_cli_tlds() {
        let config = CheckConfig::default()
            .with_default_tlds(vec!["com".to_string(), "dev".to_string()]);
        let args = Args {
            domains: vec!["culmina".to_string(), "welkin.io".to_string()],
            ..create_test_args()
        };

        let domains = get_domains_to_check(&args, &config).unwrap();
        assert_eq!(domains, vec!["culmina.com", "culmina.dev", "welkin.io"]);
    }

    #[test]
    fn test_json_output_shape() {
        let mut available = DomainReport {
            domain: "culmina.com".to_string(),
            verdict: AvailabilityVerdict::new(Availability::Available),
            pricing: Some(PriceEstimate::new(8.88, 13.98)),
        };
        available.verdict.raw_snippet = Some("No match...".to_string());
        let taken = DomainReport {
            domain: "example.com".to_string(),
            verdict: AvailabilityVerdict::new(Availability::Registered),
            pricing: None,
        };

        let value = json_output(&BatchResult::from_reports(vec![available, taken]));
        assert_eq!(value["total"], 2);
        assert_eq!(value["available"], 1);
        assert_eq!(value["results"][0]["pricing"]["renewal"], 13.98);
        assert_eq!(value["results"][1]["available"], false);
    }
}
