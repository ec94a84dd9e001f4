//! Verification keys and ordered key sets
//!
//! A [`KeySet`] is the snapshot of provider public keys a token is checked
//! against. Its order is the order keys are tried in; during a rotation overlap
//! the caller decides which key wins by placing it first.

use crate::algorithm::AlgorithmType;
use aws_lc_rs::signature::UnparsedPublicKey;

/// Elliptic curve of an EC verification key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    /// P-256 (secp256r1), used by ES256
    P256,
    /// P-384 (secp384r1), used by ES384
    P384,
    /// P-521 (secp521r1), used by ES512
    P521,
}

impl EcCurve {
    /// Parse a JWK `crv` name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(EcCurve::P256),
            "P-384" => Some(EcCurve::P384),
            "P-521" => Some(EcCurve::P521),
            _ => None,
        }
    }

    /// JWK `crv` name
    pub const fn as_str(&self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Byte length of one affine coordinate
    pub(crate) const fn coordinate_len(&self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }
}

/// Key family, which decides the algorithms a key can verify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA public key (RS256/384/512, PS256/384/512)
    Rsa,
    /// EC public key on the given curve (ES256, ES384 or ES512)
    Ec(EcCurve),
}

impl KeyKind {
    fn supports(&self, algorithm: AlgorithmType) -> bool {
        use AlgorithmType::*;

        match (self, algorithm) {
            (KeyKind::Rsa, RS256 | RS384 | RS512 | PS256 | PS384 | PS512) => true,
            (KeyKind::Ec(EcCurve::P256), ES256) => true,
            (KeyKind::Ec(EcCurve::P384), ES384) => true,
            (KeyKind::Ec(EcCurve::P521), ES512) => true,
            _ => false,
        }
    }
}

/// A public key used to verify token signatures
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationKey {
    kind: KeyKind,
    material: Vec<u8>,
    kid: Option<String>,
}

impl VerificationKey {
    /// RSA public key, DER-encoded `RSAPublicKey` or `SubjectPublicKeyInfo`
    pub fn rsa(der: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: KeyKind::Rsa,
            material: der.into(),
            kid: None,
        }
    }

    /// EC public key as an uncompressed SEC1 point (`0x04 || x || y`)
    pub fn ec(curve: EcCurve, point: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: KeyKind::Ec(curve),
            material: point.into(),
            kid: None,
        }
    }

    /// Attach a key ID, reported in logs
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Encoded key material
    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }

    /// Check `signature` over `message` with this key
    ///
    /// A key of the wrong family for `algorithm` does not verify.
    pub(crate) fn verify(&self, algorithm: AlgorithmType, message: &[u8], signature: &[u8]) -> bool {
        if !self.kind.supports(algorithm) {
            return false;
        }

        UnparsedPublicKey::new(algorithm.verification_algorithm(), &self.material)
            .verify(message, signature)
            .is_ok()
    }
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("kind", &self.kind)
            .field("kid", &self.kid)
            .field("len", &self.material.len())
            .finish()
    }
}

/// Ordered set of verification keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<VerificationKey>,
}

impl KeySet {
    pub fn new(keys: Vec<VerificationKey>) -> Self {
        Self { keys }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VerificationKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<VerificationKey>> for KeySet {
    fn from(keys: Vec<VerificationKey>) -> Self {
        Self::new(keys)
    }
}

impl FromIterator<VerificationKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = VerificationKey>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a VerificationKey;
    type IntoIter = std::slice::Iter<'a, VerificationKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
