//! Runtime platform registry: static endpoints merged with configured client credentials.

use std::collections::HashMap;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::{config_error, ConfigErrorKind, Error};
use crate::platform::Platform;

/// OAuth client credentials for one platform integration.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }
}

/// Everything needed to refresh tokens for a platform.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub token_url: Option<String>,
    pub scopes: Vec<&'static str>,
    pub credentials: Option<ClientCredentials>,
}

/// Per-platform settings, populated once at startup.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    settings: HashMap<Platform, PlatformSettings>,
}

impl PlatformRegistry {
    /// Build the registry for every known platform, resolving credentials with `lookup`.
    ///
    /// Platforms without credentials or without a token endpoint are kept in the
    /// registry but logged here, so a half-configured integration shows up at boot
    /// instead of at the first refresh attempt.
    pub fn load<F>(lookup: F) -> Self
    where
        F: Fn(Platform) -> Option<ClientCredentials>,
    {
        let mut settings = HashMap::new();

        for platform in Platform::ALL {
            let endpoints = platform.endpoints();
            let credentials = lookup(platform).filter(|c| !c.client_id.trim().is_empty());

            match (&credentials, endpoints.token_url) {
                (Some(_), Some(_)) => info!("{} integration configured", platform),
                (Some(_), None) => warn!(
                    "{} has client credentials but no token endpoint; its tokens cannot be refreshed",
                    platform
                ),
                (None, _) => warn!(
                    "{} client credentials missing; {}_CLIENT_ID / {}_CLIENT_SECRET not set",
                    platform,
                    platform.as_str().to_uppercase(),
                    platform.as_str().to_uppercase()
                ),
            }

            settings.insert(
                platform,
                PlatformSettings {
                    token_url: endpoints.token_url.map(str::to_string),
                    scopes: endpoints.scopes.to_vec(),
                    credentials,
                },
            );
        }

        Self { settings }
    }

    /// Point a platform at a different token endpoint (staging or a local mock).
    pub fn with_token_url(mut self, platform: Platform, token_url: &str) -> Result<Self, Error> {
        url::Url::parse(token_url)
            .map_err(|e| config_error(ConfigErrorKind::InvalidTokenUrl, &e.to_string()))?;

        self.settings
            .entry(platform)
            .or_insert_with(|| PlatformSettings {
                token_url: None,
                scopes: platform.endpoints().scopes.to_vec(),
                credentials: None,
            })
            .token_url = Some(token_url.to_string());
        Ok(self)
    }

    pub fn get(&self, platform: Platform) -> Option<&PlatformSettings> {
        self.settings.get(&platform)
    }

    /// Platforms whose tokens can actually be refreshed.
    pub fn refreshable_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self
            .settings
            .iter()
            .filter(|(_, s)| s.token_url.is_some() && s.credentials.is_some())
            .map(|(platform, _)| *platform)
            .collect();
        platforms.sort();
        platforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twitter_only(platform: Platform) -> Option<ClientCredentials> {
        (platform == Platform::Twitter).then(|| ClientCredentials::new("id", "secret"))
    }

    #[test]
    fn load_registers_every_platform() {
        let registry = PlatformRegistry::load(twitter_only);

        for platform in Platform::ALL {
            assert!(registry.get(platform).is_some());
        }
    }

    #[test]
    fn only_platforms_with_credentials_and_endpoint_are_refreshable() {
        let registry = PlatformRegistry::load(|platform| match platform {
            Platform::Twitter | Platform::Instagram => Some(ClientCredentials::new("id", "secret")),
            _ => None,
        });

        assert_eq!(registry.refreshable_platforms(), vec![Platform::Twitter]);
    }

    #[test]
    fn blank_client_id_counts_as_missing() {
        let registry = PlatformRegistry::load(|_| Some(ClientCredentials::new("  ", "secret")));
        assert!(registry.get(Platform::Youtube).unwrap().credentials.is_none());
    }

    #[test]
    fn with_token_url_overrides_endpoint() {
        let registry = PlatformRegistry::load(twitter_only)
            .with_token_url(Platform::Instagram, "http://127.0.0.1:9999/token")
            .unwrap();

        assert_eq!(
            registry.get(Platform::Instagram).unwrap().token_url.as_deref(),
            Some("http://127.0.0.1:9999/token")
        );
    }

    #[test]
    fn with_token_url_rejects_garbage() {
        let result = PlatformRegistry::load(twitter_only).with_token_url(Platform::Twitter, "not a url");
        assert!(result.is_err());
    }
}
