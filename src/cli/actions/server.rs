use crate::api;
use crate::api::handlers::auth::AuthConfig;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

/// Handle the server action
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(port: u16, dsn: &SecretString, api_enabled: bool) -> Result<()> {
    let config = AuthConfig::new().with_api_enabled(api_enabled);

    api::new(port, dsn.expose_secret(), config).await?;

    Ok(())
}
