//! Public key encoding for converting JWK parameters into the formats
//! accepted by aws-lc-rs
//!
//! RSA keys become DER `SubjectPublicKeyInfo` (built with the RustCrypto `spki`
//! and `der` crates); EC keys become uncompressed SEC1 points.

use crate::error::{Error, Result};
use crate::keys::EcCurve;
use der::{Encode, Sequence, asn1::UintRef};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

fn key_error(operation: &str, details: impl std::fmt::Display) -> Error {
    Error::KeyInvalid(format!("{operation}: {details}"))
}

/// RSAPublicKey as defined in RFC 3447:
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Build DER-encoded RSA SubjectPublicKeyInfo from modulus (n) and exponent (e) bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>> {
    use der::asn1::BitString;

    if n.is_empty() || e.is_empty() {
        return Err(key_error("rsa key missing n or e", "empty value"));
    }

    // 65536-bit modulus, far beyond anything a provider publishes
    const MAX_RSA_MODULUS_SIZE: usize = 8192;
    if n.len() > MAX_RSA_MODULUS_SIZE {
        return Err(key_error(
            "RSA modulus too large",
            format!(
                "{} bytes (maximum: {} bytes)",
                n.len(),
                MAX_RSA_MODULUS_SIZE
            ),
        ));
    }

    let n_uint = UintRef::new(n).map_err(|e| key_error("failed to encode RSA modulus", e))?;
    let e_uint = UintRef::new(e).map_err(|e| key_error("failed to encode RSA exponent", e))?;

    let rsa_pubkey_der = RsaPublicKey {
        modulus: n_uint,
        public_exponent: e_uint,
    }
    .to_der()
    .map_err(|e| key_error("failed to encode RSA public key", e))?;

    const RSA_ENCRYPTION_OID: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(der::asn1::AnyRef::NULL.into()),
    };

    let subject_public_key = BitString::new(0, rsa_pubkey_der)
        .map_err(|e| key_error("failed to create bit string", e))?;

    SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    }
    .to_der()
    .map_err(|e| key_error("failed to encode SPKI", e))
}

/// Build an uncompressed SEC1 point (`0x04 || x || y`) from affine coordinates
pub(crate) fn ec_point_from_xy(x: &[u8], y: &[u8], curve: EcCurve) -> Result<Vec<u8>> {
    let len = curve.coordinate_len();
    if x.len() != len || y.len() != len {
        return Err(key_error(
            "EC coordinate length mismatch",
            format!(
                "{} requires {len} bytes, found x={} y={}",
                curve.as_str(),
                x.len(),
                y.len()
            ),
        ));
    }

    let mut point = Vec::with_capacity(1 + 2 * len);
    point.push(0x04);
    point.extend_from_slice(x);
    point.extend_from_slice(y);
    Ok(point)
}
