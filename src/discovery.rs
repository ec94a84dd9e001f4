//! OIDC Discovery module
//!
//! Fetches provider metadata from `{issuer}/.well-known/openid-configuration`
//! as defined in
//! [OpenID Connect Discovery 1.0](https://openid.net/specs/openid-connect-discovery-1_0.html).

use crate::error::{Error, Result};
use crate::jwks::fetch_url;
use crate::limits::MAX_DISCOVERY_RESPONSE_SIZE;
use crate::url::{validate_issuer_url, validate_jwks_uri};
use serde::Deserialize;

/// The subset of a provider's discovery document used by this crate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub jwks_uri: String,
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
}

fn build_well_known_url(issuer: &str) -> String {
    format!("{issuer}/.well-known/openid-configuration")
}

/// Fetch the discovery document of `issuer`
///
/// No caching happens here; [`Provider`](crate::Provider) memoizes the result.
///
/// # Errors
/// - [`Error::RemoteUrlTooLong`] / [`Error::RemoteError`] for an unacceptable issuer URL
/// - [`Error::RemoteError`] on network failure, non-2xx status, invalid JSON,
///   or a missing or invalid `jwks_uri`
/// - [`Error::RemoteResponseTooLarge`] for a body over 64 KiB
pub async fn discover(client: &reqwest::Client, issuer: &str) -> Result<ProviderMetadata> {
    validate_issuer_url(issuer)?;

    let url = build_well_known_url(issuer);
    let bytes = fetch_url(client, &url, MAX_DISCOVERY_RESPONSE_SIZE).await?;

    let metadata: ProviderMetadata = serde_json::from_slice(&bytes)
        .map_err(|e| Error::RemoteError(format!("discovery: invalid discovery json: {e}")))?;

    if metadata.jwks_uri.trim().is_empty() {
        return Err(Error::RemoteError(
            "discovery: missing or empty jwks_uri".into(),
        ));
    }

    validate_jwks_uri(&metadata.jwks_uri)?;

    if metadata.issuer != issuer {
        tracing::warn!(
            configured = issuer,
            discovered = %metadata.issuer,
            "discovery document names a different issuer"
        );
    }

    tracing::debug!(issuer, jwks_uri = %metadata.jwks_uri, "discovered provider metadata");
    Ok(metadata)
}
