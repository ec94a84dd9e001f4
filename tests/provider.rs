#![cfg(feature = "remote")]

mod common;

use common::{HOURS_2, Signer, claims};
use openid_token::{Config, Error, KeySet, KeySource, Provider, Token};
use serde_json::json;

struct MockProvider {
    server: mockito::ServerGuard,
    discovery: mockito::Mock,
    jwks: mockito::Mock,
}

impl MockProvider {
    async fn start(keys: serde_json::Value) -> Self {
        let mut server = mockito::Server::new_async().await;
        let issuer = server.url();

        let discovery = server
            .mock("GET", "/.well-known/openid-configuration")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "issuer": issuer,
                    "jwks_uri": format!("{issuer}/discovery/keys"),
                    "authorization_endpoint": format!("{issuer}/oauth2/authorize"),
                    "token_endpoint": format!("{issuer}/oauth2/token"),
                    "userinfo_endpoint": format!("{issuer}/oidc/userinfo"),
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let jwks = server
            .mock("GET", "/discovery/keys")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "keys": keys }).to_string())
            .expect(1)
            .create_async()
            .await;

        Self {
            server,
            discovery,
            jwks,
        }
    }

    fn issuer(&self) -> String {
        self.server.url()
    }

    fn config(&self) -> Config {
        Config::new()
            .with_issuer(self.issuer())
            .with_client_id("client ID")
            .with_resource("audience")
    }

    async fn assert_fetched_once(&self) {
        self.discovery.assert_async().await;
        self.jwks.assert_async().await;
    }
}

#[tokio::test]
async fn test_verify_end_to_end() {
    let rsa = Signer::rsa("RS256");
    let ec = Signer::ec("ES256");
    let mock = MockProvider::start(json!([rsa.jwk(), ec.jwk()])).await;
    let provider = Provider::new(mock.config(), reqwest::Client::new());
    let issuer = mock.issuer();

    for signer in [&rsa, &ec] {
        let raw = signer.sign(&claims(&issuer, "audience", "client ID", HOURS_2));
        let token = provider.verify(&raw).await.unwrap();
        assert_eq!(token.access_token(), raw);
        assert_eq!(token.id_token().unwrap().issuer(), issuer);
    }

    mock.assert_fetched_once().await;
}

#[tokio::test]
async fn test_verify_rejects_invalid_tokens() {
    let signer = Signer::ec("ES256");
    let mock = MockProvider::start(json!([signer.jwk()])).await;
    let provider = Provider::new(mock.config(), reqwest::Client::new());
    let issuer = mock.issuer();

    let expired = signer.sign(&claims(&issuer, "audience", "client ID", -HOURS_2));
    assert_eq!(provider.verify(&expired).await, Err(Error::Expired));

    let wrong_app = signer.sign(&claims(&issuer, "audience", "other app", HOURS_2));
    assert_eq!(
        provider.verify(&wrong_app).await,
        Err(Error::InvalidApplication)
    );

    let wrong_issuer = signer.sign(&claims("https://evil.example", "audience", "client ID", HOURS_2));
    assert_eq!(
        provider.verify(&wrong_issuer).await,
        Err(Error::InvalidIssuer)
    );

    let unknown_key = Signer::ec("ES256").sign(&claims(&issuer, "audience", "client ID", HOURS_2));
    assert_eq!(
        provider.verify(&unknown_key).await,
        Err(Error::UnverifiableSignature)
    );

    assert_eq!(provider.verify("").await, Err(Error::Required));

    mock.assert_fetched_once().await;
}

#[tokio::test]
async fn test_clones_share_cache() {
    let signer = Signer::ec("ES384");
    let mock = MockProvider::start(json!([signer.jwk()])).await;
    let provider = Provider::new(mock.config(), reqwest::Client::new());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.public_keys().await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().len(), 1);
    }

    mock.assert_fetched_once().await;
}

#[tokio::test]
async fn test_discovered_endpoints() {
    let mock = MockProvider::start(json!([])).await;
    let issuer = mock.issuer();
    let provider = Provider::new(
        mock.config()
            .with_token_endpoint("https://override.example/token"),
        reqwest::Client::new(),
    );

    assert_eq!(
        provider.authorization_endpoint().await.unwrap(),
        Some(format!("{issuer}/oauth2/authorize"))
    );
    assert_eq!(
        provider.token_endpoint().await.unwrap().as_deref(),
        Some("https://override.example/token")
    );
    assert_eq!(
        provider.userinfo_endpoint().await.unwrap(),
        Some(format!("{issuer}/oidc/userinfo"))
    );
    assert_eq!(provider.metadata().await.unwrap().issuer, issuer);
}

#[tokio::test]
async fn test_empty_jwks_rejects_every_token() {
    let signer = Signer::ec("ES256");
    let mock = MockProvider::start(json!([{ "kty": "oct", "k": "c2VjcmV0" }])).await;
    let provider = Provider::new(mock.config(), reqwest::Client::new());

    assert!(provider.public_keys().await.unwrap().is_empty());

    let raw = signer.sign(&claims(&mock.issuer(), "audience", "client ID", HOURS_2));
    assert_eq!(
        provider.verify(&raw).await,
        Err(Error::UnverifiableSignature)
    );
}

async fn decode_from<S: KeySource>(source: &S, issuer: &str, raw: &str) -> openid_token::Result<Token> {
    let keys = source.public_keys(issuer).await?;
    Token::decode(raw, &keys)
}

#[tokio::test]
async fn test_key_sources_are_interchangeable() {
    let signer = Signer::ec("ES256");
    let mock = MockProvider::start(json!([signer.jwk()])).await;
    let issuer = mock.issuer();
    let raw = signer.sign(&claims(&issuer, "audience", "client ID", HOURS_2));

    let provider = Provider::new(mock.config(), reqwest::Client::new());
    let fixed = KeySet::new(vec![signer.verification_key()]);

    assert!(decode_from(&provider, &issuer, &raw).await.is_ok());
    assert!(decode_from(&fixed, &issuer, &raw).await.is_ok());
}
