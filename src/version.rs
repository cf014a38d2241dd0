//! Client/backend version compatibility.
//!
//! The client advertises its version in `X-WAVE-Client-Version` and the
//! backend answers with `X-WAVE-API-Version`. Matching major versions are
//! compatible. Mismatches are logged, never fatal.

/// Version advertised to the backend unless overridden on the client.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const CLIENT_VERSION_HEADER: &str = "X-WAVE-Client-Version";
pub(crate) const API_VERSION_HEADER: &str = "X-WAVE-API-Version";

/// Parses `major.minor.patch`, tolerating a leading `v` and a pre-release
/// or build suffix. Anything else is `None`.
pub(crate) fn parse_version(version: &str) -> Option<(u64, u64, u64)> {
    let version = version.trim().trim_start_matches('v');
    let core = match version.find(['-', '+']) {
        Some(index) => &version[..index],
        None => version,
    };

    let mut parts = core.split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Same major version means compatible. Unparseable versions degrade to
/// compatible rather than blocking anything.
pub(crate) fn is_compatible(client: &str, api: &str) -> bool {
    match (parse_version(client), parse_version(api)) {
        (Some(client), Some(api)) => client.0 == api.0,
        _ => true,
    }
}

pub(crate) fn compatibility_warning(client: &str, api: &str) -> Option<String> {
    let client_parsed = parse_version(client)?;
    let api_parsed = parse_version(api)?;
    if client_parsed.0 == api_parsed.0 {
        return None;
    }
    if client_parsed.0 > api_parsed.0 {
        Some(format!(
            "client version {client} is newer than API version {api}; \
             update the backend or downgrade the client"
        ))
    } else {
        Some(format!(
            "client version {client} is older than API version {api}; \
             update the client for newer features and fixes"
        ))
    }
}

/// Records the version pair observed on a response.
pub(crate) fn note_api_version(client: &str, api: &str) {
    if is_compatible(client, api) {
        tracing::debug!(client, api, "api version compatible");
    } else {
        let warning = compatibility_warning(client, api).unwrap_or_default();
        tracing::warn!(client, api, %warning, "api version mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::{compatibility_warning, is_compatible, parse_version};

    #[test]
    fn parses_plain_and_prefixed_versions() {
        assert_eq!(parse_version("1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_version("v1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_version("1.2.3-beta.1"), Some((1, 2, 3)));
        assert_eq!(parse_version("1.2.3+build.9"), Some((1, 2, 3)));
        assert_eq!(parse_version(" 10.0.1 "), Some((10, 0, 1)));
    }

    #[test]
    fn rejects_malformed_versions() {
        for bad in ["", "1.2", "1.2.3.4", "1.2.x", "1.2.3rc1", "one.two.three"] {
            assert_eq!(parse_version(bad), None, "input {bad:?}");
        }
    }

    #[test]
    fn same_major_is_compatible() {
        assert!(is_compatible("1.0.0", "1.5.2"));
        assert!(is_compatible("2.1.0", "2.0.9"));
        assert!(!is_compatible("1.9.0", "2.0.0"));
    }

    #[test]
    fn unparseable_versions_degrade_to_compatible() {
        assert!(is_compatible("dev", "1.0.0"));
        assert!(is_compatible("1.0.0", ""));
    }

    #[test]
    fn warning_names_the_newer_side() {
        let warning = compatibility_warning("2.0.0", "1.4.0").expect("must warn");
        assert!(warning.contains("newer than API"));

        let warning = compatibility_warning("1.0.0", "2.0.0").expect("must warn");
        assert!(warning.contains("older than API"));

        assert_eq!(compatibility_warning("1.0.0", "1.9.9"), None);
    }
}
