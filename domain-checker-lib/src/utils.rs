//! Utility functions for domain input processing.

use std::time::Duration;

/// The suffix of a domain: everything after the last `.`.
///
/// A string without a separator is returned whole.
pub fn extract_suffix(domain: &str) -> &str {
    let domain = domain.trim();
    match domain.rfind('.') {
        Some(idx) => &domain[idx + 1..],
        None => domain,
    }
}

/// Expand domain inputs based on smart detection rules.
///
/// - Inputs with dots are treated as FQDNs (no expansion)
/// - Inputs without dots are base names, expanded with every TLD in `tlds`
/// - Empty inputs and comment lines (`#`) are skipped
/// - Duplicates are dropped, first occurrence wins
///
/// # Arguments
///
/// * `inputs` - Base names and/or fully qualified domains
/// * `tlds` - TLDs to use for expansion of base names
///
/// # Returns
///
/// Domain strings ready for checking, in input order.
pub fn expand_domain_inputs(inputs: &[String], tlds: &[String]) -> Vec<String> {
    let mut results: Vec<String> = Vec::new();

    let mut push = |domain: String| {
        if !results.contains(&domain) {
            results.push(domain);
        }
    };

    for input in inputs {
        let trimmed = input.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.contains('.') {
            push(trimmed.to_string());
        } else {
            for tld in tlds {
                let tld_clean = tld.trim().trim_start_matches('.');
                if !tld_clean.is_empty() {
                    push(format!("{}.{}", trimmed, tld_clean));
                }
            }
        }
    }

    results
}

/// Split a comma-separated TLD list, dropping blanks and leading dots.
pub fn parse_tld_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a timeout string like "5s", "30s", "2m", "500ms" or "10".
///
/// A bare number is read as seconds. Returns `None` for anything else.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_suffix() {
        assert_eq!(extract_suffix("example.com"), "com");
        assert_eq!(extract_suffix("test.co.uk"), "uk");
        assert_eq!(extract_suffix(" example.io "), "io");
        assert_eq!(extract_suffix("example"), "example");
        assert_eq!(extract_suffix("example."), "");
    }

    #[test]
    fn test_expand_domain_inputs() {
        let inputs = vec!["culmina".to_string(), "welkin.io".to_string()];
        let tlds = vec!["com".to_string(), ".ai".to_string()];

        let result = expand_domain_inputs(&inputs, &tlds);
        assert_eq!(result, vec!["culmina.com", "culmina.ai", "welkin.io"]);
    }

    #[test]
    fn test_expand_domain_inputs_skips_blank_comments_and_duplicates() {
        let inputs = vec![
            "".to_string(),
            "# sky themed".to_string(),
            "skyvault".to_string(),
            "skyvault.com".to_string(),
            "  ".to_string(),
        ];
        let tlds = vec!["com".to_string()];

        let result = expand_domain_inputs(&inputs, &tlds);
        assert_eq!(result, vec!["skyvault.com"]);
    }

    #[test]
    fn test_parse_tld_list() {
        assert_eq!(parse_tld_list("com, .IO,,ai "), vec!["com", "io", "ai"]);
        assert!(parse_tld_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout_string("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout_string("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout_string("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_timeout_string("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout_string("invalid"), None);
        assert_eq!(parse_timeout_string(""), None);
    }

    #[test]
    fn test_parse_timeout_string_rejects_overflowing_minutes() {
        assert_eq!(parse_timeout_string("307445734561825861m"), None);
        assert_eq!(
            parse_timeout_string("307445734561825860m"),
            Some(Duration::from_secs(307445734561825860 * 60))
        );
    }
}
