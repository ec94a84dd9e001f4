use serde::Deserialize;

/// JOSE header of a signed token
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Key ID, logged but not used for key selection
    #[serde(rename = "kid", default)]
    pub key_id: Option<String>,
}
