//! Provider key discovery with process-lifetime caching
//!
//! ```text
//! Provider::verify(raw)
//!     │ public_keys()  ── cache miss ──▶ discover(issuer) ──▶ fetch_jwks(jwks_uri)
//!     ▼
//! Token::decode(raw, keys)
//!     │ validate(config.assertions())
//!     ▼
//! Token
//! ```
//!
//! Discovery documents and key sets are cached per issuer for the life of the
//! [`Provider`]. There is no refresh; build a new provider to pick up rotated
//! keys.

use crate::config::Config;
use crate::discovery::{ProviderMetadata, discover};
use crate::error::{Error, Result};
use crate::jwks::fetch_jwks;
use crate::keys::KeySet;
use crate::token::Token;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

/// Issuers cached per provider; one is the common case
const MAX_CACHED_ISSUERS: u64 = 16;

/// Supplies the public keys tokens from an issuer are verified against
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn public_keys(&self, issuer: &str) -> Result<Arc<KeySet>>;
}

/// A fixed key set serves every issuer
#[async_trait]
impl KeySource for KeySet {
    async fn public_keys(&self, _issuer: &str) -> Result<Arc<KeySet>> {
        Ok(Arc::new(self.clone()))
    }
}

/// OpenID provider client: discovery, key fetching and token verification
///
/// Cheap to clone; clones share their caches. Concurrent first requests for an
/// issuer share a single discovery and JWKS fetch. Failures are not cached.
#[derive(Clone)]
pub struct Provider {
    config: Arc<Config>,
    client: reqwest::Client,
    metadata: Cache<String, Arc<ProviderMetadata>>,
    keys: Cache<String, Arc<KeySet>>,
}

impl Provider {
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
            metadata: Cache::builder().max_capacity(MAX_CACHED_ISSUERS).build(),
            keys: Cache::builder().max_capacity(MAX_CACHED_ISSUERS).build(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn issuer(&self) -> Result<&str> {
        self.config
            .issuer()
            .ok_or_else(|| Error::ConfigurationInvalid("issuer is not configured".into()))
    }

    /// Discovery document of the configured issuer
    pub async fn metadata(&self) -> Result<Arc<ProviderMetadata>> {
        let issuer = self.issuer()?;
        self.metadata_for(issuer).await
    }

    /// Public keys of the configured issuer
    ///
    /// # Errors
    /// [`Error::ConfigurationInvalid`] without a configured issuer, otherwise
    /// any discovery or JWKS error.
    pub async fn public_keys(&self) -> Result<Arc<KeySet>> {
        let issuer = self.issuer()?;
        self.keys_for(issuer).await
    }

    /// Configured authorization endpoint, else the discovered one
    pub async fn authorization_endpoint(&self) -> Result<Option<String>> {
        if let Some(endpoint) = self.config.authorization_endpoint() {
            return Ok(Some(endpoint.to_string()));
        }
        Ok(self.metadata().await?.authorization_endpoint.clone())
    }

    /// Configured token endpoint, else the discovered one
    pub async fn token_endpoint(&self) -> Result<Option<String>> {
        if let Some(endpoint) = self.config.token_endpoint() {
            return Ok(Some(endpoint.to_string()));
        }
        Ok(self.metadata().await?.token_endpoint.clone())
    }

    /// Configured userinfo endpoint, else the discovered one
    pub async fn userinfo_endpoint(&self) -> Result<Option<String>> {
        if let Some(endpoint) = self.config.userinfo_endpoint() {
            return Ok(Some(endpoint.to_string()));
        }
        Ok(self.metadata().await?.userinfo_endpoint.clone())
    }

    /// Decode `raw` against the configured issuer's keys and validate it
    /// against [`Config::assertions`]
    pub async fn verify(&self, raw: &str) -> Result<Token> {
        let keys = self.public_keys().await?;
        let token = Token::decode(raw, &keys)?;
        token.validate(&self.config.assertions())?;
        Ok(token)
    }

    async fn metadata_for(&self, issuer: &str) -> Result<Arc<ProviderMetadata>> {
        self.metadata
            .try_get_with(issuer.to_string(), async {
                tracing::debug!(issuer, "provider metadata cache miss");
                discover(&self.client, issuer).await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    async fn keys_for(&self, issuer: &str) -> Result<Arc<KeySet>> {
        self.keys
            .try_get_with(issuer.to_string(), async {
                tracing::debug!(issuer, "public key cache miss");
                let metadata = self.metadata_for(issuer).await?;
                let jwks = fetch_jwks(&self.client, &metadata.jwks_uri).await?;
                let keys = jwks.to_key_set();
                if keys.is_empty() {
                    tracing::warn!(issuer, jwks_uri = %metadata.jwks_uri, "JWKS contains no usable keys");
                }
                Ok::<_, Error>(Arc::new(keys))
            })
            .await
            .map_err(|e| (*e).clone())
    }
}

#[async_trait]
impl KeySource for Provider {
    async fn public_keys(&self, issuer: &str) -> Result<Arc<KeySet>> {
        self.keys_for(issuer).await
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("config", &self.config)
            .field("cached_issuers", &self.keys.entry_count())
            .finish()
    }
}
