//! Identity token claims
//!
//! [`ClaimsSet`] is the decoded payload of an identity token. The standard
//! OpenID Connect claims are typed fields; the application-id claim (`appid`)
//! is a typed optional field; everything else is kept verbatim in a
//! string-keyed map so provider-specific claims survive decoding.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded claims of an identity token
///
/// Immutable once constructed. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimsSet {
    #[serde(rename = "iss")]
    issuer: String,

    #[serde(rename = "sub")]
    subject: String,

    /// Audience, normalized to a list when the token carries a single string
    #[serde(rename = "aud", deserialize_with = "deserialize_audience")]
    audience: Vec<String>,

    #[serde(rename = "exp", deserialize_with = "deserialize_numeric_date")]
    expiration: i64,

    #[serde(rename = "iat", deserialize_with = "deserialize_numeric_date")]
    issued_at: i64,

    /// Application the token was issued to
    #[serde(rename = "appid", default, deserialize_with = "deserialize_application_id")]
    application_id: Option<String>,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Deserialize audience as either string or array
fn deserialize_audience<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct AudienceVisitor;

    impl<'de> Visitor<'de> for AudienceVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Vec<String>, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut values = Vec::new();
            while let Some(value) = seq.next_element()? {
                values.push(value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_any(AudienceVisitor)
}

/// Deserialize a NumericDate, truncating fractional seconds
fn deserialize_numeric_date<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct NumericDateVisitor;

    impl Visitor<'_> for NumericDateVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("seconds since the epoch")
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<i64, E>
        where
            E: de::Error,
        {
            i64::try_from(value).map_err(|_| E::custom(format!("timestamp out of range: {value}")))
        }

        fn visit_f64<E>(self, value: f64) -> std::result::Result<i64, E>
        where
            E: de::Error,
        {
            if !value.is_finite() || value.abs() >= i64::MAX as f64 {
                return Err(E::custom(format!("timestamp out of range: {value}")));
            }
            Ok(value.trunc() as i64)
        }
    }

    deserializer.deserialize_any(NumericDateVisitor)
}

/// Deserialize `appid`, keeping numbers and booleans in their string form
fn deserialize_application_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct ApplicationIdVisitor;

    impl Visitor<'_> for ApplicationIdVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Value::from(value).to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ApplicationIdVisitor)
}

impl ClaimsSet {
    /// Parse claims from a JSON payload
    ///
    /// `iss`, `sub`, `aud`, `exp` and `iat` are required.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| Error::Malformed(format!("Failed to parse claims: {e}")))
    }

    /// Issuer (iss)
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Subject (sub)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Audience (aud)
    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    /// Expiration Time (exp)
    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    /// Issued At (iat)
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Application ID (appid), when the provider sets one
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    /// Claims without a typed field
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Look up any claim by its JSON name
    ///
    /// Typed claims are returned in their normalized form, so `aud` is always
    /// an array.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "iss" => Some(Value::from(self.issuer.as_str())),
            "sub" => Some(Value::from(self.subject.as_str())),
            "aud" => Some(Value::from(self.audience.clone())),
            "exp" => Some(Value::from(self.expiration)),
            "iat" => Some(Value::from(self.issued_at)),
            "appid" => self.application_id.as_deref().map(Value::from),
            _ => self.extra.get(name).cloned(),
        }
    }

    pub(crate) fn is_expired_at(&self, now: i64) -> bool {
        self.expiration <= now
    }
}
