//! Configuration loading from environment and command-line overrides.

use std::time::Duration;

use fx_client::ClientConfig;
use fx_core::ControllerConfig;
use fx_types::CurrencyCode;

/// Application configuration.
pub struct Config {
    pub client: ClientConfig,
    pub controller: ControllerConfig,
}

impl Config {
    /// Loads `FX_*` variables, then applies any flags given on the command line.
    pub fn load(
        api_url: Option<String>,
        timeout_secs: Option<u64>,
        bootstrap_base: &str,
    ) -> anyhow::Result<Self> {
        let mut client = ClientConfig::from_env()?;
        if let Some(url) = api_url {
            client.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            client.timeout = Duration::from_secs(secs);
        }

        let bootstrap_base: CurrencyCode = bootstrap_base
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid bootstrap base: {:?}", bootstrap_base))?;

        let controller = ControllerConfig {
            bootstrap_base,
            ..ControllerConfig::default()
        };

        Ok(Self { client, controller })
    }
}
