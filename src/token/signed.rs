use crate::algorithm::AlgorithmType;
use crate::claims::ClaimsSet;
use crate::error::{Error, Result};
use crate::header::TokenHeader;
use crate::keys::{KeySet, VerificationKey};
use crate::limits::{
    MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE,
    MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;

/// A compact JWS whose structure has been parsed but whose signature has not
/// been checked
///
/// Parsing happens once per token; the same parsed object is then checked
/// against each candidate key.
pub(crate) struct SignedToken<'a> {
    header: TokenHeader,
    signing_input: &'a str,
    signature: Vec<u8>,
    claims: ClaimsSet,
}

impl<'a> SignedToken<'a> {
    /// Split and decode `header.payload.signature`
    pub(crate) fn parse(token: &'a str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::Malformed(format!(
                "Token too large: {} bytes (maximum: {MAX_TOKEN_LENGTH} bytes)",
                token.len()
            )));
        }

        let (signing_input, signature_b64) = token.rsplit_once('.').ok_or_else(format_error)?;
        let (header_b64, payload_b64) = signing_input.split_once('.').ok_or_else(format_error)?;
        if payload_b64.contains('.') {
            return Err(format_error());
        }

        let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)?;
        let header: TokenHeader = serde_json::from_str(&header_json)
            .map_err(|e| Error::Malformed(format!("Failed to parse header: {e}")))?;

        let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
        let claims = ClaimsSet::from_json(&payload_json)?;

        let signature = base64url::decode_bytes(signature_b64, MAX_DECODED_SIGNATURE_SIZE)?;

        tracing::trace!(alg = %header.algorithm, kid = ?header.key_id, "parsed token structure");

        Ok(Self {
            header,
            signing_input,
            signature,
            claims,
        })
    }

    /// Find the first key in `keys` that verifies the signature
    ///
    /// Keys are tried in order and the search stops at the first match, so a
    /// later key is never reported when an earlier one verifies.
    pub(crate) fn verify<'k>(&self, keys: &'k KeySet) -> Option<&'k VerificationKey> {
        let Some(algorithm) = AlgorithmType::from_header(&self.header.algorithm) else {
            tracing::warn!(alg = %self.header.algorithm, "token algorithm cannot be verified with a public key");
            return None;
        };

        for (index, key) in keys.iter().enumerate() {
            if key.verify(algorithm, self.signing_input.as_bytes(), &self.signature) {
                tracing::debug!(index, kid = ?key.kid(), %algorithm, "token signature verified");
                return Some(key);
            }
            tracing::debug!(index, kid = ?key.kid(), %algorithm, "key did not verify token signature");
        }

        tracing::warn!(
            keys = keys.len(),
            kid = ?self.header.key_id,
            %algorithm,
            "no key verified token signature"
        );
        None
    }

    pub(crate) fn into_claims(self) -> ClaimsSet {
        self.claims
    }
}

fn format_error() -> Error {
    Error::Malformed("Invalid JWT format: expected three parts separated by '.'".into())
}
