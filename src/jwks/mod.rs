//! JSON Web Key Set (JWKS) module
mod jwk;

pub use jwk::Jwk;

use crate::error::{Error, Result};
use crate::keys::KeySet;
use serde::Deserialize;

#[cfg(feature = "remote")]
use crate::limits::{MAX_JWK_SET_SIZE, MAX_JWKS_RESPONSE_SIZE};
#[cfg(feature = "remote")]
use crate::url::validate_jwks_uri;

/// JSON Web Key Set document (`{ "keys": [...] }`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Parse a JWKS document
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| Error::KeyInvalid(format!("invalid jwks json: {e}")))
    }

    /// Convert every usable key, in document order
    ///
    /// Keys that cannot verify signatures (encryption keys, symmetric or
    /// unknown key types, unsupported curves, bad parameters) are skipped, so
    /// the result may be empty.
    pub fn to_key_set(&self) -> KeySet {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(index, jwk)| match jwk.to_verification_key() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!(index, kid = ?jwk.kid, error = %e, "skipping unusable JWK");
                    None
                }
            })
            .collect()
    }
}

/// Fetch a document, rejecting non-2xx responses and bodies over `max_size`
#[cfg(feature = "remote")]
pub(crate) async fn fetch_url(client: &reqwest::Client, url: &str, max_size: usize) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::RemoteError(format!(
            "http: status {}",
            response.status()
        )));
    }

    if let Some(length) = response.content_length() {
        if length > max_size as u64 {
            return Err(Error::RemoteResponseTooLarge {
                size: usize::try_from(length).unwrap_or(usize::MAX),
                max: max_size,
            });
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

    // Content-Length may be absent or wrong
    if bytes.len() > max_size {
        return Err(Error::RemoteResponseTooLarge {
            size: bytes.len(),
            max: max_size,
        });
    }

    Ok(bytes.to_vec())
}

/// Fetch and parse the JWKS document at `jwks_uri`
///
/// # Errors
/// - [`Error::RemoteUrlTooLong`] / [`Error::RemoteError`] for an unacceptable URI
/// - [`Error::RemoteError`] on network failure, non-2xx status or invalid JSON
/// - [`Error::RemoteResponseTooLarge`] for a body over 512 KiB
/// - [`Error::RemoteJwkSetTooLarge`] for more than 100 keys
#[cfg(feature = "remote")]
pub async fn fetch_jwks(client: &reqwest::Client, jwks_uri: &str) -> Result<JwkSet> {
    validate_jwks_uri(jwks_uri)?;

    let bytes = fetch_url(client, jwks_uri, MAX_JWKS_RESPONSE_SIZE).await?;

    let set: JwkSet = serde_json::from_slice(&bytes)
        .map_err(|e| Error::RemoteError(format!("jwks: invalid jwks json: {e}")))?;

    if set.keys.len() > MAX_JWK_SET_SIZE {
        return Err(Error::RemoteJwkSetTooLarge {
            key_count: set.keys.len(),
            max: MAX_JWK_SET_SIZE,
        });
    }

    tracing::debug!(uri = jwks_uri, keys = set.keys.len(), "fetched JWKS");
    Ok(set)
}
