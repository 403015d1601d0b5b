//! SSRF (Server-Side Request Forgery) validation for webhook URLs.
//!
//! Webhook URLs are user supplied, so they are validated before every dispatch
//! to prevent requests to internal/private hosts. Hostnames are resolved and
//! the resolved addresses checked too (prevents DNS rebinding).

use std::net::{IpAddr, Ipv6Addr};
use tokio::net::lookup_host;

/// Validate a webhook URL before sending.
///
/// Rejects private/internal IPs, localhost, and internal hostnames unless
/// `allow_private_hosts` is set. When `allowlist` is present, the hostname must
/// match one of its entries (exact or subdomain).
pub async fn validate_url(
    url: &str,
    allow_private_hosts: bool,
    allowlist: Option<&[String]>,
) -> Result<(), String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| format!("Invalid URL format: {}", e))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("URL must start with http:// or https://".to_string());
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| "URL must have a host".to_string())?
        .to_lowercase();

    if let Some(allowed) = allowlist {
        let matches_allowlist = allowed.iter().any(|entry| {
            let entry = entry.to_lowercase();
            host == entry || host.ends_with(&format!(".{}", entry))
        });
        if !matches_allowlist {
            return Err(format!(
                "Webhook host '{}' is not in the allowed list",
                host
            ));
        }
    }

    if allow_private_hosts {
        return Ok(());
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err("Private/internal IP addresses are not allowed".to_string());
        }
    } else {
        if is_internal_hostname(&host) {
            return Err("Localhost and internal hostnames are not allowed".to_string());
        }

        let port = parsed
            .port()
            .unwrap_or(if parsed.scheme() == "https" { 443 } else { 80 });

        let resolved = lookup_host((host.as_str(), port)).await.map_err(|e| {
            tracing::warn!(host = %host, error = %e, "DNS resolution failed during webhook URL validation");
            format!("Hostname could not be resolved: {}", e)
        })?;

        for addr in resolved {
            if is_private_ip(&addr.ip()) {
                return Err(format!(
                    "Hostname resolves to private/internal IP address: {}",
                    addr.ip()
                ));
            }
        }
    }

    Ok(())
}

fn is_internal_hostname(host: &str) -> bool {
    host == "localhost"
        || host == "0.0.0.0"
        || host.starts_with("0.")
        || host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".corp")
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                // Carrier-grade NAT (100.64.0.0/10)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0b1100_0000) == 64)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || is_unique_local_v6(v6)
                || is_link_local_v6(v6)
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(&IpAddr::V4(v4)))
        }
    }
}

// fc00::/7
fn is_unique_local_v6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

// fe80::/10
fn is_link_local_v6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_http_schemes() {
        let err = validate_url("ftp://files.example/hook", false, None)
            .await
            .unwrap_err();
        assert!(err.contains("http"));
    }

    #[tokio::test]
    async fn test_rejects_loopback_and_private_ips() {
        for url in [
            "http://127.0.0.1/hook",
            "http://10.0.0.8/hook",
            "http://192.168.1.1/hook",
            "http://169.254.169.254/latest/meta-data",
            "http://[::1]/hook",
        ] {
            assert!(
                validate_url(url, false, None).await.is_err(),
                "{} should be rejected",
                url
            );
        }
    }

    #[tokio::test]
    async fn test_rejects_internal_hostnames() {
        assert!(validate_url("http://localhost:9000/hook", false, None)
            .await
            .is_err());
        assert!(validate_url("https://ci.corp/hook", false, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_allow_private_hosts_bypasses_checks() {
        assert!(validate_url("http://127.0.0.1:9000/hook", true, None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_allowlist_matches_exact_and_subdomains() {
        let allowlist = vec!["hook.example".to_string()];
        assert!(
            validate_url("https://hook.example/a", true, Some(&allowlist))
                .await
                .is_ok()
        );
        assert!(
            validate_url("https://eu.hook.example/a", true, Some(&allowlist))
                .await
                .is_ok()
        );
        assert!(
            validate_url("https://evil.example/a", true, Some(&allowlist))
                .await
                .is_err()
        );
    }
}
