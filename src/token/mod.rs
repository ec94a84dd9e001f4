//! Identity tokens
//!
//! [`Token::decode`] turns a raw token string into a [`Token`] whose claims
//! have been verified against a [`KeySet`]; [`Token::validate`] then enforces
//! expiry, audience, application and issuer policy on those claims.
//!
//! ```text
//! raw string ──decode(keys)──▶ Token ──validate(assertions)──▶ true
//!      │                          │
//!      ├─ Required                ├─ Expired
//!      ├─ Malformed               ├─ InvalidAudience
//!      └─ UnverifiableSignature   ├─ InvalidApplication
//!                                 └─ InvalidIssuer
//! ```
//!
//! Nonce and replay checks are not performed.

mod assertions;
mod signed;

pub use assertions::Assertions;

use crate::claims::ClaimsSet;
use crate::error::{Error, Result};
use crate::keys::KeySet;
use serde_json::Value;
use signed::SignedToken;
use std::time::{SystemTime, UNIX_EPOCH};

/// A bearer token and, once decoded, its verified identity claims
///
/// A `Token` returned by [`Token::decode`] always carries an id token whose
/// signature verified against one of the supplied keys. Tokens assembled by
/// hand with [`Token::new`] carry whatever the caller attached.
#[derive(Clone, PartialEq)]
pub struct Token {
    access_token: String,
    id_token: Option<ClaimsSet>,
    refresh_token: Option<String>,
}

impl Token {
    /// Wrap a raw access token without decoding it
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id_token: None,
            refresh_token: None,
        }
    }

    /// Attach identity claims
    pub fn with_id_token(mut self, claims: ClaimsSet) -> Self {
        self.id_token = Some(claims);
        self
    }

    /// Attach a refresh token; it is carried along and never validated
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Decode `raw` and verify its signature against `keys`
    ///
    /// The token structure is parsed once; a structurally invalid token fails
    /// with [`Error::Malformed`] without trying any key. Keys are then tried in
    /// order and the first one that verifies wins. An empty key set, or one in
    /// which no key verifies, fails with [`Error::UnverifiableSignature`].
    ///
    /// # Errors
    /// - [`Error::Required`] if `raw` is empty or blank
    /// - [`Error::Malformed`] if `raw` is not a well-formed signed token
    /// - [`Error::UnverifiableSignature`] if no key verifies the signature
    pub fn decode(raw: &str, keys: &KeySet) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::Required);
        }

        let signed = SignedToken::parse(raw)?;

        if signed.verify(keys).is_none() {
            return Err(Error::UnverifiableSignature);
        }

        Ok(Self::new(raw).with_id_token(signed.into_claims()))
    }

    /// Check the token's claims against `assertions`
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// expiry, audience, application, issuer. Assertions left unset are not
    /// checked. A token whose claims carry no application id passes the
    /// application check.
    ///
    /// # Errors
    /// - [`Error::Required`] if the token carries no id token
    /// - [`Error::Expired`] if the token expired at or before now
    /// - [`Error::InvalidAudience`] if the asserted audience is not among the token's audiences
    /// - [`Error::InvalidApplication`] if the token names a different application
    /// - [`Error::InvalidIssuer`] if the token was issued by someone else
    pub fn validate(&self, assertions: &Assertions) -> Result<bool> {
        let claims = self.id_token.as_ref().ok_or(Error::Required)?;

        if claims.is_expired_at(current_timestamp()) {
            return Err(Error::Expired);
        }

        if let Some(audience) = assertions.audience_ref() {
            if !claims.audience().iter().any(|aud| aud == audience) {
                return Err(Error::InvalidAudience);
            }
        }

        if let Some(client_id) = assertions.client_id_ref() {
            if claims
                .application_id()
                .is_some_and(|appid| appid != client_id)
            {
                return Err(Error::InvalidApplication);
            }
        }

        if let Some(issuer) = assertions.issuer_ref() {
            if claims.issuer() != issuer {
                return Err(Error::InvalidIssuer);
            }
        }

        Ok(true)
    }

    /// Whether the token expired at or before the current time
    ///
    /// A token without an id token counts as expired.
    pub fn expired(&self) -> bool {
        self.id_token
            .as_ref()
            .is_none_or(|claims| claims.is_expired_at(current_timestamp()))
    }

    /// The raw bearer credential
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Verified identity claims
    pub fn id_token(&self) -> Option<&ClaimsSet> {
        self.id_token.as_ref()
    }

    /// Refresh token, when the token was built with one
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Look up an identity claim by its JSON name
    pub fn claim(&self, name: &str) -> Option<Value> {
        self.id_token.as_ref().and_then(|claims| claims.get(name))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.access_token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("id_token", &self.id_token)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Get current Unix timestamp
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs() as i64
}
