//! # openid-token
//!
//! Decode, verify and validate OpenID Connect identity tokens.
//!
//! A relying party receives a signed identity token, checks its signature
//! against the provider's public keys, and checks the claims inside against
//! what it expects: not expired, meant for this audience and application,
//! issued by the trusted provider.
//!
//! ## Quick Start
//!
//! ```ignore
//! use openid_token::{Assertions, KeySet, Token};
//!
//! let keys: KeySet = jwk_set.to_key_set();
//! let token = Token::decode(raw, &keys)?;
//! token.validate(
//!     &Assertions::new()
//!         .audience("api://my-app")
//!         .client_id("client-abc")
//!         .issuer("https://login.example.com/tenant/v2.0"),
//! )?;
//!
//! println!("subject: {}", token.id_token().map(|c| c.subject()).unwrap_or_default());
//! ```
//!
//! With the `remote` feature (enabled by default), [`Provider`] discovers the
//! provider's keys, caches them and runs both steps:
//!
//! ```ignore
//! use openid_token::{Config, Provider};
//!
//! let provider = Provider::new(Config::from_env(), reqwest::Client::new());
//! let token = provider.verify(raw).await?;
//! ```
//!
//! ## Validation Flow
//!
//! ```text
//! raw token string
//!     │ Token::decode(raw, &keys)
//!     │   blank           → Required
//!     │   bad structure   → Malformed
//!     │   no key verifies → UnverifiableSignature
//!     ▼
//! Token (signature verified)
//!     │ Token::validate(&assertions)
//!     │   exp <= now      → Expired
//!     │   aud mismatch    → InvalidAudience
//!     │   appid mismatch  → InvalidApplication
//!     │   iss mismatch    → InvalidIssuer
//!     ▼
//! Ok(true)
//! ```
//!
//! Keys are tried in the order given and the first one that verifies wins, so
//! key rotation overlap is handled by supplying both keys. The token header's
//! `kid` is not used to pick a key.
//!
//! ## Supported Algorithms
//!
//! - **RSA**: RS256, RS384, RS512, PS256, PS384, PS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! Tokens signed with `none` or an HMAC algorithm never verify.
//!
//! ## Limitations
//!
//! Nonce and replay checks are not performed.

mod error;
mod jwks;

pub(crate) mod algorithm;
pub(crate) mod claims;
pub(crate) mod config;
pub(crate) mod header;
pub(crate) mod keys;
pub(crate) mod limits;
pub(crate) mod token;
pub(crate) mod utils;

#[cfg(feature = "remote")]
pub(crate) mod discovery;
#[cfg(feature = "remote")]
pub(crate) mod provider;
#[cfg(feature = "remote")]
pub(crate) mod url;

pub use algorithm::AlgorithmType;
pub use claims::ClaimsSet;
pub use config::{Config, env};
pub use error::{Error, Result};
pub use jwks::{Jwk, JwkSet};
pub use keys::{EcCurve, KeyKind, KeySet, VerificationKey};
pub use token::{Assertions, Token};

#[cfg(feature = "remote")]
pub use discovery::{ProviderMetadata, discover};
#[cfg(feature = "remote")]
pub use jwks::fetch_jwks;
#[cfg(feature = "remote")]
pub use provider::{KeySource, Provider};
