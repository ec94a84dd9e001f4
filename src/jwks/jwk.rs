//! JWK (JSON Web Key) struct and conversion

use crate::error::{Error, Result};
use crate::keys::{EcCurve, VerificationKey};
use crate::limits::{MAX_JWK_COORDINATE_SIZE, MAX_JWK_E_SIZE, MAX_JWK_N_SIZE};
use crate::utils::base64url;
use crate::utils::der::{ec_point_from_xy, rsa_spki_from_n_e};
use serde::Deserialize;

/// JSON Web Key (RFC 7517), limited to the members used for signature keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Jwk {
    /// Key type ("RSA" or "EC")
    pub kty: Option<String>,
    pub kid: Option<String>,
    /// Advisory; the token header decides the algorithm
    pub alg: Option<String>,
    /// "sig", "enc", or absent for any purpose
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    /// RSA modulus (Base64URL)
    pub n: Option<String>,
    /// RSA exponent (Base64URL)
    pub e: Option<String>,
    /// Curve name ("P-256", "P-384", "P-521")
    pub crv: Option<String>,
    /// EC x-coordinate (Base64URL)
    pub x: Option<String>,
    /// EC y-coordinate (Base64URL)
    pub y: Option<String>,
}

impl Jwk {
    /// Convert to a [`VerificationKey`], carrying the `kid` along
    ///
    /// # Errors
    /// [`Error::KeyInvalid`] if the key is not meant for signatures, has an
    /// unsupported type or curve, or its parameters are missing, oversized or
    /// undecodable.
    pub fn to_verification_key(&self) -> Result<VerificationKey> {
        if let Some(key_use) = self.key_use.as_deref() {
            if key_use != "sig" {
                return Err(Error::KeyInvalid(format!(
                    "key use mismatch: expected 'sig', found '{key_use}'"
                )));
            }
        }

        let key = match self.kty.as_deref() {
            Some("RSA") => self.to_rsa_key()?,
            Some("EC") => self.to_ec_key()?,
            Some(other) => {
                return Err(Error::KeyInvalid(format!("unsupported key type: {other}")));
            }
            None => return Err(Error::KeyInvalid("missing key type (kty)".into())),
        };

        Ok(match &self.kid {
            Some(kid) => key.with_kid(kid),
            None => key,
        })
    }

    fn to_rsa_key(&self) -> Result<VerificationKey> {
        // Base64URL: 4 chars → 3 bytes
        const MAX_DECODED_JWK_N: usize = (MAX_JWK_N_SIZE * 3) / 4;
        const MAX_DECODED_JWK_E: usize = (MAX_JWK_E_SIZE * 3) / 4;

        let n = required(&self.n, "rsa key missing n (modulus)")?;
        let e = required(&self.e, "rsa key missing e (exponent)")?;

        check_field_size("n", n, MAX_JWK_N_SIZE)?;
        check_field_size("e", e, MAX_JWK_E_SIZE)?;

        let n_bytes = decode_field("n", n, MAX_DECODED_JWK_N)?;
        let e_bytes = decode_field("e", e, MAX_DECODED_JWK_E)?;

        rsa_spki_from_n_e(&n_bytes, &e_bytes).map(VerificationKey::rsa)
    }

    fn to_ec_key(&self) -> Result<VerificationKey> {
        const MAX_DECODED_JWK_COORDINATE: usize = (MAX_JWK_COORDINATE_SIZE * 3) / 4;

        let crv = required(&self.crv, "ec key missing curve (crv)")?;
        let curve = EcCurve::from_name(crv)
            .ok_or_else(|| Error::KeyInvalid(format!("unsupported curve: {crv}")))?;

        let x = required(&self.x, "ec key missing x coordinate")?;
        let y = required(&self.y, "ec key missing y coordinate")?;

        check_field_size("x", x, MAX_JWK_COORDINATE_SIZE)?;
        check_field_size("y", y, MAX_JWK_COORDINATE_SIZE)?;

        let x_bytes = decode_field("x", x, MAX_DECODED_JWK_COORDINATE)?;
        let y_bytes = decode_field("y", y, MAX_DECODED_JWK_COORDINATE)?;

        ec_point_from_xy(&x_bytes, &y_bytes, curve).map(|point| VerificationKey::ec(curve, point))
    }
}

fn required<'a>(field: &'a Option<String>, message: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| Error::KeyInvalid(message.into()))
}

fn check_field_size(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::KeyInvalid(format!(
            "{field} too large: {} bytes (maximum: {max} bytes)",
            value.len()
        )));
    }
    Ok(())
}

fn decode_field(field: &str, value: &str, max: usize) -> Result<Vec<u8>> {
    base64url::decode_bytes(value, max).map_err(|e| match e {
        Error::Malformed(msg) => Error::KeyInvalid(format!("failed to decode {field}: {msg}")),
        other => other,
    })
}
