//! Client configuration
//!
//! [`Config`] holds the relying-party settings for one OpenID provider. It is
//! an explicit value passed to whoever needs it; nothing is cached globally.

use crate::token::Assertions;

/// Environment variable names read by [`Config::from_env`]
pub mod env {
    pub const CLIENT_ID: &str = "OPENID_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "OPENID_CLIENT_SECRET";
    pub const ISSUER: &str = "OPENID_ISSUER";
    pub const DOMAIN_HINT: &str = "OPENID_DOMAIN_HINT";
    pub const PROMPT: &str = "OPENID_PROMPT";
    pub const REDIRECT_URI: &str = "OPENID_REDIRECT_URI";
    pub const RESOURCE: &str = "OPENID_RESOURCE";
    pub const AUTHORIZATION_URI: &str = "OPENID_AUTHORIZATION_URI";
    pub const AUTHORIZATION_ENDPOINT: &str = "OPENID_AUTHORIZATION_ENDPOINT";
    pub const TOKEN_ENDPOINT: &str = "OPENID_TOKEN_ENDPOINT";
    pub const USERINFO_ENDPOINT: &str = "OPENID_USERINFO_ENDPOINT";
}

/// Relying-party configuration for one OpenID provider
///
/// Every field is optional. Endpoint fields, when set, take precedence over
/// the values found by discovery.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    client_id: Option<String>,
    client_secret: Option<String>,
    issuer: Option<String>,
    domain_hint: Option<String>,
    prompt: Option<String>,
    redirect_uri: Option<String>,
    resource: Option<String>,
    authorization_uri: Option<String>,
    authorization_endpoint: Option<String>,
    token_endpoint: Option<String>,
    userinfo_endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `OPENID_*` environment variables
    ///
    /// Unset and blank variables are treated as absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, called once per variable name in
    /// [`env`]
    ///
    /// ```
    /// use openid_token::Config;
    ///
    /// let config = Config::from_lookup(|name| match name {
    ///     "OPENID_ISSUER" => Some("https://login.example.com".to_string()),
    ///     "OPENID_CLIENT_ID" => Some("client-abc".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.issuer(), Some("https://login.example.com"));
    /// assert_eq!(config.client_id(), Some("client-abc"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            client_id: get(env::CLIENT_ID),
            client_secret: get(env::CLIENT_SECRET),
            issuer: get(env::ISSUER),
            domain_hint: get(env::DOMAIN_HINT),
            prompt: get(env::PROMPT),
            redirect_uri: get(env::REDIRECT_URI),
            resource: get(env::RESOURCE),
            authorization_uri: get(env::AUTHORIZATION_URI),
            authorization_endpoint: get(env::AUTHORIZATION_ENDPOINT),
            token_endpoint: get(env::TOKEN_ENDPOINT),
            userinfo_endpoint: get(env::USERINFO_ENDPOINT),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_domain_hint(mut self, domain_hint: impl Into<String>) -> Self {
        self.domain_hint = Some(domain_hint.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Resource the tokens are requested for; also the expected audience
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_authorization_uri(mut self, authorization_uri: impl Into<String>) -> Self {
        self.authorization_uri = Some(authorization_uri.into());
        self
    }

    pub fn with_authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorization_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_userinfo_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.userinfo_endpoint = Some(endpoint.into());
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    pub fn domain_hint(&self) -> Option<&str> {
        self.domain_hint.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn authorization_uri(&self) -> Option<&str> {
        self.authorization_uri.as_deref()
    }

    /// Configured authorization endpoint override
    pub fn authorization_endpoint(&self) -> Option<&str> {
        self.authorization_endpoint.as_deref()
    }

    /// Configured token endpoint override
    pub fn token_endpoint(&self) -> Option<&str> {
        self.token_endpoint.as_deref()
    }

    /// Configured userinfo endpoint override
    pub fn userinfo_endpoint(&self) -> Option<&str> {
        self.userinfo_endpoint.as_deref()
    }

    /// Assertions for tokens issued under this configuration
    ///
    /// The audience is the configured resource; client id and issuer are
    /// taken as configured. Unset values impose no constraint.
    pub fn assertions(&self) -> Assertions {
        let mut assertions = Assertions::new();
        if let Some(resource) = &self.resource {
            assertions = assertions.audience(resource);
        }
        if let Some(client_id) = &self.client_id {
            assertions = assertions.client_id(client_id);
        }
        if let Some(issuer) = &self.issuer {
            assertions = assertions.issuer(issuer);
        }
        assertions
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("issuer", &self.issuer)
            .field("domain_hint", &self.domain_hint)
            .field("prompt", &self.prompt)
            .field("redirect_uri", &self.redirect_uri)
            .field("resource", &self.resource)
            .field("authorization_uri", &self.authorization_uri)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("userinfo_endpoint", &self.userinfo_endpoint)
            .finish()
    }
}
