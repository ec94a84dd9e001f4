//! Token signing helpers shared by the integration tests
//!
//! RSA keys are generated once with the `rsa` crate (2048-bit generation is
//! slow) and signed with aws-lc-rs; EC keys are generated per signer.

#![allow(dead_code)]

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING,
    ECDSA_P521_SHA512_FIXED_SIGNING, EcdsaKeyPair, KeyPair, RSA_PKCS1_SHA256, RSA_PKCS1_SHA384,
    RSA_PKCS1_SHA512, RSA_PSS_SHA256, RSA_PSS_SHA384, RSA_PSS_SHA512, RsaKeyPair,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use openid_token::{EcCurve, VerificationKey};
use serde_json::{Value, json};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

pub const HOURS_2: i64 = 2 * 60 * 60;

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Identity claims expiring `exp_offset` seconds from now
pub fn claims(issuer: &str, audience: &str, appid: &str, exp_offset: i64) -> Value {
    json!({
        "iss": issuer,
        "sub": "user-123",
        "aud": audience,
        "exp": now() + exp_offset,
        "iat": now(),
        "appid": appid,
    })
}

struct RsaMaterial {
    pkcs8: Vec<u8>,
    n: Vec<u8>,
    e: Vec<u8>,
}

fn rsa_material() -> &'static RsaMaterial {
    static MATERIAL: OnceLock<RsaMaterial> = OnceLock::new();
    MATERIAL.get_or_init(|| {
        use rsa::RsaPrivateKey;
        use rsa::pkcs8::EncodePrivateKey;
        use rsa::traits::PublicKeyParts;

        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate key");
        let public_key = private_key.to_public_key();

        RsaMaterial {
            pkcs8: private_key
                .to_pkcs8_der()
                .expect("failed to serialize private key")
                .as_bytes()
                .to_vec(),
            n: public_key.n().to_bytes_be(),
            e: public_key.e().to_bytes_be(),
        }
    })
}

enum SigningKey {
    Rsa(RsaKeyPair),
    Ec(EcdsaKeyPair, EcCurve),
}

/// Signs tokens with one algorithm and key
pub struct Signer {
    alg: &'static str,
    kid: String,
    key: SigningKey,
}

impl Signer {
    /// RS256/384/512 or PS256/384/512 with the shared RSA key
    pub fn rsa(alg: &'static str) -> Self {
        let keypair = RsaKeyPair::from_pkcs8(&rsa_material().pkcs8).unwrap();
        Self {
            alg,
            kid: format!("rsa-{alg}"),
            key: SigningKey::Rsa(keypair),
        }
    }

    /// ES256, ES384 or ES512 with a fresh key
    pub fn ec(alg: &'static str) -> Self {
        let (signing_alg, curve) = match alg {
            "ES256" => (&ECDSA_P256_SHA256_FIXED_SIGNING, EcCurve::P256),
            "ES384" => (&ECDSA_P384_SHA384_FIXED_SIGNING, EcCurve::P384),
            "ES512" => (&ECDSA_P521_SHA512_FIXED_SIGNING, EcCurve::P521),
            other => panic!("not an EC algorithm: {other}"),
        };
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(signing_alg, &rng).unwrap();
        let keypair = EcdsaKeyPair::from_pkcs8(signing_alg, pkcs8.as_ref()).unwrap();
        Self {
            alg,
            kid: format!("ec-{alg}"),
            key: SigningKey::Ec(keypair, curve),
        }
    }

    pub fn with_kid(mut self, kid: &str) -> Self {
        self.kid = kid.to_string();
        self
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The public half as a key the crate verifies with
    pub fn verification_key(&self) -> VerificationKey {
        match &self.key {
            SigningKey::Rsa(keypair) => VerificationKey::rsa(keypair.public_key().as_ref()),
            SigningKey::Ec(keypair, curve) => {
                VerificationKey::ec(*curve, keypair.public_key().as_ref())
            }
        }
        .with_kid(self.kid.clone())
    }

    /// The public half as a JWK member of a JWKS document
    pub fn jwk(&self) -> Value {
        match &self.key {
            SigningKey::Rsa(_) => json!({
                "kty": "RSA",
                "kid": self.kid,
                "use": "sig",
                "alg": self.alg,
                "n": URL_SAFE_NO_PAD.encode(&rsa_material().n),
                "e": URL_SAFE_NO_PAD.encode(&rsa_material().e),
            }),
            SigningKey::Ec(keypair, curve) => {
                let point = keypair.public_key().as_ref();
                let len = (point.len() - 1) / 2;
                json!({
                    "kty": "EC",
                    "kid": self.kid,
                    "use": "sig",
                    "crv": curve.as_str(),
                    "x": URL_SAFE_NO_PAD.encode(&point[1..=len]),
                    "y": URL_SAFE_NO_PAD.encode(&point[len + 1..]),
                })
            }
        }
    }

    /// Sign `claims` into a compact token
    pub fn sign(&self, claims: &Value) -> String {
        let header = json!({ "alg": self.alg, "typ": "JWT", "kid": self.kid });
        self.sign_with_header(&header, claims)
    }

    pub fn sign_with_header(&self, header: &Value, claims: &Value) -> String {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        );
        let signature = self.signature(signing_input.as_bytes());
        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }

    fn signature(&self, message: &[u8]) -> Vec<u8> {
        let rng = SystemRandom::new();
        match &self.key {
            SigningKey::Rsa(keypair) => {
                let mut signature = vec![0u8; keypair.public_modulus_len()];
                match self.alg {
                    "RS256" => keypair.sign(&RSA_PKCS1_SHA256, &rng, message, &mut signature),
                    "RS384" => keypair.sign(&RSA_PKCS1_SHA384, &rng, message, &mut signature),
                    "RS512" => keypair.sign(&RSA_PKCS1_SHA512, &rng, message, &mut signature),
                    "PS256" => keypair.sign(&RSA_PSS_SHA256, &rng, message, &mut signature),
                    "PS384" => keypair.sign(&RSA_PSS_SHA384, &rng, message, &mut signature),
                    "PS512" => keypair.sign(&RSA_PSS_SHA512, &rng, message, &mut signature),
                    other => panic!("not an RSA algorithm: {other}"),
                }
                .unwrap();
                signature
            }
            SigningKey::Ec(keypair, _) => keypair.sign(&rng, message).unwrap().as_ref().to_vec(),
        }
    }
}

/// Rewrite the subject claim, keeping the original signature
pub fn tamper_payload(token: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    let mut claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    claims["sub"] = json!("admin");
    format!(
        "{}.{}.{}",
        parts[0],
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        parts[2]
    )
}
