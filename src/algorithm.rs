//! Signature algorithms accepted for identity tokens
use aws_lc_rs::signature;

/// Algorithm identifier from the token header
///
/// Only asymmetric algorithms are listed: identity tokens are verified with
/// provider public keys, so `none` and the HMAC family never verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmType {
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    ES256,
    ES384,
    ES512,
}

impl AlgorithmType {
    /// Parse the `alg` header value, `None` for anything a public key cannot verify
    pub(crate) fn from_header(s: &str) -> Option<Self> {
        match s {
            "RS256" => Some(AlgorithmType::RS256),
            "RS384" => Some(AlgorithmType::RS384),
            "RS512" => Some(AlgorithmType::RS512),
            "PS256" => Some(AlgorithmType::PS256),
            "PS384" => Some(AlgorithmType::PS384),
            "PS512" => Some(AlgorithmType::PS512),
            "ES256" => Some(AlgorithmType::ES256),
            "ES384" => Some(AlgorithmType::ES384),
            "ES512" => Some(AlgorithmType::ES512),
            _ => None,
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::RS256 => "RS256",
            AlgorithmType::RS384 => "RS384",
            AlgorithmType::RS512 => "RS512",
            AlgorithmType::PS256 => "PS256",
            AlgorithmType::PS384 => "PS384",
            AlgorithmType::PS512 => "PS512",
            AlgorithmType::ES256 => "ES256",
            AlgorithmType::ES384 => "ES384",
            AlgorithmType::ES512 => "ES512",
        }
    }

    /// Get the verification algorithm for signature verification
    ///
    /// Note: JWT ECDSA signatures use IEEE P1363 format (fixed-length R||S),
    /// not ASN.1 DER encoding, as per RFC 7518 Section 3.4.
    pub(crate) fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            AlgorithmType::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            AlgorithmType::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            AlgorithmType::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
            AlgorithmType::PS256 => &signature::RSA_PSS_2048_8192_SHA256,
            AlgorithmType::PS384 => &signature::RSA_PSS_2048_8192_SHA384,
            AlgorithmType::PS512 => &signature::RSA_PSS_2048_8192_SHA512,
            AlgorithmType::ES256 => &signature::ECDSA_P256_SHA256_FIXED,
            AlgorithmType::ES384 => &signature::ECDSA_P384_SHA384_FIXED,
            AlgorithmType::ES512 => &signature::ECDSA_P521_SHA512_FIXED,
        }
    }
}

impl std::fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for AlgorithmType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_header() {
        assert_eq!(AlgorithmType::from_header("none"), None);
        assert_eq!(AlgorithmType::from_header("HS256"), None);
        assert_eq!(AlgorithmType::from_header("UNKNOWN"), None);
        assert_eq!(AlgorithmType::from_header("rs256"), None);

        assert_eq!(
            AlgorithmType::from_header("RS256"),
            Some(AlgorithmType::RS256)
        );
        assert_eq!(
            AlgorithmType::from_header("PS384"),
            Some(AlgorithmType::PS384)
        );
        assert_eq!(
            AlgorithmType::from_header("ES512"),
            Some(AlgorithmType::ES512)
        );
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", AlgorithmType::RS256), "RS256");
        assert_eq!(format!("{}", AlgorithmType::PS512), "PS512");
        assert_eq!(format!("{}", AlgorithmType::ES384), "ES384");
    }
}
