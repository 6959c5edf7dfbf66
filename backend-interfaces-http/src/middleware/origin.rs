use axum::http::HeaderMap;

use backend_domain::CallerIdentity;

// Hostname match only; ports and schemes are ignored.
pub fn origin_allowed(headers: &HeaderMap) -> bool {
    let Some(origin) = header_str(headers, "Origin") else {
        return false;
    };
    let Some(host) = header_str(headers, "Host") else {
        return false;
    };
    match (origin_hostname(origin), hostname(host)) {
        (Some(origin_host), Some(serving_host)) => {
            origin_host.eq_ignore_ascii_case(&serving_host)
        }
        _ => false,
    }
}

// Real-ip wins, then the first forwarded-for hop.
pub fn caller_identity(headers: &HeaderMap) -> CallerIdentity {
    let mut caller = CallerIdentity::anonymous();
    if let Some(address) = header_str(headers, "x-real-ip")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .or_else(|| forwarded_for_hop(headers))
    {
        caller.address = address;
    }
    caller.agent = header_str(headers, "user-agent")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);
    caller
}

fn origin_hostname(origin: &str) -> Option<String> {
    let trimmed = origin.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    let authority = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    hostname(authority)
}

fn hostname(authority: &str) -> Option<String> {
    let authority = authority.trim();
    if authority.is_empty() {
        return None;
    }
    if let Some(rest) = authority.strip_prefix('[') {
        let end = rest.find(']')?;
        return Some(rest[..end].to_string());
    }
    let host = authority.split('/').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn forwarded_for_hop(headers: &HeaderMap) -> Option<String> {
    let value = header_str(headers, "x-forwarded-for")?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).expect("header name"),
                HeaderValue::from_str(value).expect("header value"),
            );
        }
        map
    }

    #[test]
    fn origin_allowed_requires_matching_hostname() {
        let matching = headers(&[
            ("origin", "http://localhost:3210"),
            ("host", "localhost:3210"),
        ]);
        assert!(origin_allowed(&matching));

        let different_port = headers(&[("origin", "https://localhost"), ("host", "localhost:3210")]);
        assert!(origin_allowed(&different_port));

        let mismatched = headers(&[("origin", "http://evil.example"), ("host", "localhost:3210")]);
        assert!(!origin_allowed(&mismatched));
    }

    #[test]
    fn origin_allowed_rejects_missing_or_null_origin() {
        let missing = headers(&[("host", "localhost:3210")]);
        assert!(!origin_allowed(&missing));

        let null_origin = headers(&[("origin", "null"), ("host", "localhost:3210")]);
        assert!(!origin_allowed(&null_origin));
    }

    #[test]
    fn origin_allowed_handles_bracketed_ipv6() {
        let v6 = headers(&[("origin", "http://[::1]:3210"), ("host", "[::1]:3210")]);
        assert!(origin_allowed(&v6));
    }

    #[test]
    fn origin_comparison_ignores_case() {
        let mixed = headers(&[("origin", "http://LocalHost:3210"), ("host", "localhost:3210")]);
        assert!(origin_allowed(&mixed));
    }

    #[test]
    fn caller_identity_prefers_real_ip_header() {
        let map = headers(&[
            ("x-real-ip", "203.0.113.9"),
            ("x-forwarded-for", "198.51.100.1, 10.0.0.1"),
            ("user-agent", "droplog-web/1.0"),
        ]);
        let caller = caller_identity(&map);
        assert_eq!(caller.address, "203.0.113.9");
        assert_eq!(caller.agent.as_deref(), Some("droplog-web/1.0"));
    }

    #[test]
    fn caller_identity_falls_back_to_first_forwarded_hop() {
        let map = headers(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1")]);
        let caller = caller_identity(&map);
        assert_eq!(caller.address, "198.51.100.1");
        assert!(caller.agent.is_none());
    }

    #[test]
    fn caller_identity_defaults_to_unknown() {
        let caller = caller_identity(&HeaderMap::new());
        assert_eq!(caller.address, "unknown");
    }
}
