/// Expected values checked against a token's claims by
/// [`Token::validate`](crate::Token::validate)
///
/// Every field is optional; an omitted field imposes no constraint.
///
/// ```
/// use openid_token::Assertions;
///
/// let assertions = Assertions::new()
///     .audience("api://my-app")
///     .client_id("client-abc")
///     .issuer("https://login.example.com/tenant/v2.0");
/// assert_eq!(assertions.audience_ref(), Some("api://my-app"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assertions {
    audience: Option<String>,
    client_id: Option<String>,
    issuer: Option<String>,
}

impl Assertions {
    /// Assertions that accept any audience, application and issuer
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `audience` to be one of the token's audiences
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Require the token's application id, when present, to equal `client_id`
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Require the token's issuer to equal `issuer`
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn audience_ref(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn client_id_ref(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn issuer_ref(&self) -> Option<&str> {
        self.issuer.as_deref()
    }
}
