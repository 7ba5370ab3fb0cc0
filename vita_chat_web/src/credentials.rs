use anyhow::Context;
use tracing::info;

/// How completion requests authenticate against the provider.
pub enum ProviderAuth {
    /// Bearer key attached to every request.
    Bearer(String),
    /// No explicit key; the deployment's ambient workload identity is
    /// expected to authorize the call at the network boundary.
    Ambient,
}

/// Where the provider key comes from, selected by configuration presence.
#[derive(Debug, PartialEq, Eq)]
enum KeySource {
    Vault(String),
    Static(String),
    Ambient,
}

fn select_key_source(secret_id: Option<String>, static_key: Option<String>) -> KeySource {
    match (secret_id, static_key) {
        (Some(secret_id), _) => KeySource::Vault(secret_id),
        (None, Some(key)) => KeySource::Static(key),
        (None, None) => KeySource::Ambient,
    }
}

/// Resolves provider credentials from the environment. A configured secret
/// id wins over a static key; with neither, requests go out unsigned.
/// Failures here are startup failures, not per-request ones.
pub async fn resolve() -> anyhow::Result<ProviderAuth> {
    let secret_id = std::env::var(crate::env::KEY_SECRET_ID).ok();
    let static_key = std::env::var(crate::env::API_KEY).ok();

    match select_key_source(secret_id, static_key) {
        KeySource::Vault(secret_id) => {
            let key = fetch_key_from_vault(&secret_id).await?;
            Ok(ProviderAuth::Bearer(key))
        }
        KeySource::Static(key) => Ok(ProviderAuth::Bearer(key)),
        KeySource::Ambient => {
            info!("no provider key configured, relying on ambient workload identity");
            Ok(ProviderAuth::Ambient)
        }
    }
}

async fn fetch_key_from_vault(secret_id: &str) -> anyhow::Result<String> {
    info!("resolving provider api key from secret '{secret_id}'");

    let shared_config = aws_config::load_from_env().await;
    let client = aws_sdk_secretsmanager::Client::new(&shared_config);

    let secret = client
        .get_secret_value()
        .secret_id(secret_id)
        .send()
        .await
        .with_context(|| format!("error fetching provider api key secret '{secret_id}'"))?;

    secret
        .secret_string()
        .map(|key| key.to_owned())
        .context("provider api key secret has no string value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_secret_wins_over_static_key() {
        let source = select_key_source(
            Some("vita/provider-api-key".to_string()),
            Some("sk-static".to_string()),
        );
        assert_eq!(KeySource::Vault("vita/provider-api-key".to_string()), source);
    }

    #[test]
    fn static_key_is_used_without_a_secret_id() {
        let source = select_key_source(None, Some("sk-static".to_string()));
        assert_eq!(KeySource::Static("sk-static".to_string()), source);
    }

    #[test]
    fn no_configuration_falls_back_to_ambient_identity() {
        assert_eq!(KeySource::Ambient, select_key_source(None, None));
    }
}
