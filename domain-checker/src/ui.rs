//! Terminal display logic for the domain-checker CLI.
//!
//! Colored result lines and the closing summary. Uses only the `console`
//! crate.

use console::{pad_str, style, Alignment};
use domain_checker_lib::{Availability, AvailabilityVerdict, DomainReport, PriceEstimate};
use std::time::Duration;

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single domain report with colors and alignment.
pub fn print_result(report: &DomainReport, show_info: bool) {
    let domain_width = 30;
    let padded_domain = pad_str(&report.domain, domain_width, Alignment::Left, Some(".."));

    match report.verdict.status {
        Availability::Available => {
            let price_str = report
                .pricing
                .as_ref()
                .map(|p| format!("  {}", style(format_pricing(p)).dim()))
                .unwrap_or_default();
            let note_str = report
                .verdict
                .note
                .as_ref()
                .map(|n| format!("  {}", style(format!("({})", n)).dim()))
                .unwrap_or_default();
            println!(
                "  {}  {}{}{}",
                style(&padded_domain).white(),
                style("AVAILABLE").green().bold(),
                price_str,
                note_str,
            );
        }
        Availability::Registered => {
            let info_str = if show_info {
                format!("  {}", style(format_verdict_info(&report.verdict)).dim())
            } else {
                String::new()
            };
            println!(
                "  {}  {}{}",
                style(&padded_domain).white(),
                style("TAKEN").red().bold(),
                info_str,
            );
        }
        Availability::Unknown => {
            println!(
                "  {}  {}  {}",
                style(&padded_domain).white(),
                style("UNKNOWN").yellow(),
                style(brief_error(&report.verdict)).dim(),
            );
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the closing counts line.
pub fn print_summary(
    total: usize,
    available: usize,
    taken: usize,
    unknown: usize,
    duration: Duration,
) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", taken)).red(),
        style("|").dim(),
        style(format!("{} unknown", unknown)).yellow(),
    );
}

// ── Formatting helpers ───────────────────────────────────────────────────────

/// Registrar and dates of a registered domain as one line.
pub fn format_verdict_info(verdict: &AvailabilityVerdict) -> String {
    let mut parts = Vec::new();
    if let Some(registrar) = &verdict.registrar {
        parts.push(format!("Registrar: {}", registrar));
    }
    if let Some(created) = &verdict.created_date {
        parts.push(format!("Created: {}", created));
    }
    if let Some(expires) = &verdict.expiry_date {
        parts.push(format!("Expires: {}", expires));
    }
    if parts.is_empty() {
        "No info available".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn format_pricing(pricing: &PriceEstimate) -> String {
    format!("{} / renews {}", pricing.registration, pricing.renewal)
}

/// Extract a brief reason from an unknown verdict.
fn brief_error(verdict: &AvailabilityVerdict) -> &str {
    match &verdict.error {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("invalid domain") {
                "(invalid domain)"
            } else if m.contains("lookup address")
                || m.contains("name or service")
                || m.contains("name resolution")
            {
                "(dns error)"
            } else {
                "(error)"
            }
        }
        None => "(unknown status)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
