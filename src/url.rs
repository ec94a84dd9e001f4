//! URL checks applied before any remote fetch
//!
//! Issuer and JWKS URLs come from configuration or from a provider's
//! discovery document; both are bounded in length and restricted to http(s)
//! with a host before a request is made.

use crate::error::{Error, Result};
use crate::limits::{MAX_ISSUER_URL_LENGTH, MAX_JWKS_URI_LENGTH};

fn validate_url_common(url: &str, max_length: usize, name: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::RemoteError(format!("{name} cannot be empty")));
    }

    if url.len() > max_length {
        return Err(Error::RemoteUrlTooLong {
            length: url.len(),
            max: max_length,
        });
    }

    let parsed = url
        .parse::<url::Url>()
        .map_err(|e| Error::RemoteError(format!("invalid {name}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::RemoteError(format!(
            "{name} must use http or https scheme"
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::RemoteError(format!("{name} must have a valid host")));
    }

    Ok(parsed)
}

/// Issuer URLs are compared verbatim against `iss`, so no trailing slash
pub(crate) fn validate_issuer_url(issuer: &str) -> Result<()> {
    validate_url_common(issuer, MAX_ISSUER_URL_LENGTH, "issuer URL")?;

    if issuer.ends_with('/') {
        return Err(Error::RemoteError(
            "issuer URL must not end with trailing slash".into(),
        ));
    }

    Ok(())
}

pub(crate) fn validate_jwks_uri(uri: &str) -> Result<()> {
    validate_url_common(uri, MAX_JWKS_URI_LENGTH, "JWKS URI").map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_url_valid() {
        assert!(validate_issuer_url("https://login.example.com/tenant/v2.0").is_ok());
        assert!(validate_issuer_url("http://localhost:3000").is_ok());
    }

    #[test]
    fn test_issuer_url_rejected() {
        assert!(validate_issuer_url("").is_err());
        assert!(validate_issuer_url("https://login.example.com/").is_err());
        assert!(validate_issuer_url("ftp://login.example.com").is_err());
        assert!(validate_issuer_url("https://").is_err());
        assert!(validate_issuer_url("not a url").is_err());
    }

    #[test]
    fn test_issuer_url_too_long() {
        let long_url = format!("https://example.com/{}", "a".repeat(MAX_ISSUER_URL_LENGTH));
        assert!(matches!(
            validate_issuer_url(&long_url),
            Err(Error::RemoteUrlTooLong { max, .. }) if max == MAX_ISSUER_URL_LENGTH
        ));
    }

    #[test]
    fn test_jwks_uri() {
        assert!(validate_jwks_uri("https://login.example.com/discovery/keys").is_ok());
        assert!(validate_jwks_uri("http://localhost:3000/jwks.json").is_ok());
        assert!(
            matches!(validate_jwks_uri("   "), Err(Error::RemoteError(msg)) if msg.contains("JWKS URI cannot be empty"))
        );
        assert!(validate_jwks_uri("file:///etc/passwd").is_err());

        let long_uri = format!("https://example.com/{}", "a".repeat(MAX_JWKS_URI_LENGTH));
        assert!(matches!(
            validate_jwks_uri(&long_uri),
            Err(Error::RemoteUrlTooLong { .. })
        ));
    }
}
