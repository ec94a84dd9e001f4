//! Verify an identity token against the provider named in `OPENID_ISSUER`
//!
//! ```not_rust
//! OPENID_ISSUER=https://login.example.com/tenant/v2.0 \
//! OPENID_CLIENT_ID=client-abc \
//! OPENID_RESOURCE=api://my-app \
//!     cargo run --example verify_token -- <token>
//! ```

use openid_token::{Config, Provider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openid_token=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw = std::env::args()
        .nth(1)
        .ok_or("usage: verify_token <token>")?;

    let config = Config::from_env();
    tracing::info!(?config, "loaded configuration");

    let provider = Provider::new(config, reqwest::Client::new());

    match provider.verify(&raw).await {
        Ok(token) => {
            if let Some(claims) = token.id_token() {
                println!("subject:  {}", claims.subject());
                println!("issuer:   {}", claims.issuer());
                println!("audience: {}", claims.audience().join(", "));
                println!("expires:  {}", claims.expiration());
            }
            Ok(())
        }
        Err(e) if e.is_token_rejection() => {
            tracing::warn!(error = %e, "token rejected");
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(error = %e, "could not verify token");
            Err(e.into())
        }
    }
}
