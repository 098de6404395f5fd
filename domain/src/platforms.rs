//! Builds the platform registry and token endpoint client from configuration.

use log::info;
use service::config::Config;

use crate::error::Error;
use crate::{ClientCredentials, Platform, PlatformRegistry, TokenEndpointClient};

/// Registry of every platform with the client credentials found in `config`.
pub fn registry_from_config(config: &Config) -> PlatformRegistry {
    PlatformRegistry::load(|platform: Platform| {
        config
            .client_credentials(platform.as_str())
            .map(|(client_id, client_secret)| ClientCredentials::new(client_id, client_secret))
    })
}

/// Token endpoint client using the configured request timeout.
pub fn token_client_from_config(config: &Config) -> Result<TokenEndpointClient, Error> {
    let registry = registry_from_config(config);
    let refreshable: Vec<&str> = registry
        .refreshable_platforms()
        .iter()
        .map(Platform::as_str)
        .collect();
    info!(
        "Token refresh enabled for: [{}] (timeout {}s)",
        refreshable.join(", "),
        config.token_request_timeout_secs
    );

    Ok(TokenEndpointClient::new(
        registry,
        config.token_request_timeout(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["repurpose_platform"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn configured_credentials_are_registered() {
        let config = config(&[
            "--youtube-client-id",
            "yt-id",
            "--youtube-client-secret",
            "yt-secret",
        ]);

        let registry = registry_from_config(&config);
        let youtube = registry.get(Platform::Youtube).unwrap();
        assert_eq!(
            youtube.credentials.as_ref().map(|c| c.client_id.as_str()),
            Some("yt-id")
        );
        assert!(registry.refreshable_platforms().contains(&Platform::Youtube));
    }

    #[test]
    fn instagram_is_never_refreshable() {
        let config = config(&[
            "--instagram-client-id",
            "ig-id",
            "--instagram-client-secret",
            "ig-secret",
        ]);

        let registry = registry_from_config(&config);
        assert!(!registry.refreshable_platforms().contains(&Platform::Instagram));
    }

    #[test]
    fn token_client_builds_with_configured_timeout() {
        let config = config(&["--token-request-timeout-secs", "3"]);
        assert!(token_client_from_config(&config).is_ok());
    }
}
