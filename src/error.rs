//! Errors for openid-token
//!
//! The first seven variants are token rejections produced by
//! [`Token::decode`](crate::Token::decode) and
//! [`Token::validate`](crate::Token::validate). The remaining variants belong to
//! the configuration and key-discovery collaborators and are never returned by
//! the core.

use thiserror::Error;

/// openid-token Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Token is required")]
    Required,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature could not be verified by any known key")]
    UnverifiableSignature,

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Token has expired")]
    Expired,

    #[error("Token audience is not accepted")]
    InvalidAudience,

    #[error("Token was issued to a different application")]
    InvalidApplication,

    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Invalid key: {0}")]
    KeyInvalid(String),

    // ============================================================================
    // Remote/JWKS Errors
    // ============================================================================
    #[cfg(feature = "remote")]
    #[error("Remote error: {0}")]
    RemoteError(String),

    #[cfg(feature = "remote")]
    #[error("Remote URL too long: {length} characters (maximum: {max} characters)")]
    RemoteUrlTooLong { length: usize, max: usize },

    #[cfg(feature = "remote")]
    #[error("Remote response too large: {size} bytes (maximum: {max} bytes)")]
    RemoteResponseTooLarge { size: usize, max: usize },

    #[cfg(feature = "remote")]
    #[error("Remote JWK set too large: {key_count} keys (maximum: {max} keys)")]
    RemoteJwkSetTooLarge { key_count: usize, max: usize },
}

impl Error {
    /// Whether this error rejects a token, as opposed to a failure of
    /// configuration or key discovery.
    ///
    /// Token rejections are per-request outcomes (a web layer maps them to
    /// 401/403); the other kinds usually point at the deployment.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Error::Required
                | Error::Malformed(_)
                | Error::UnverifiableSignature
                | Error::Expired
                | Error::InvalidAudience
                | Error::InvalidApplication
                | Error::InvalidIssuer
        )
    }
}

/// Result type alias for openid-token operations
pub type Result<T> = std::result::Result<T, Error>;
