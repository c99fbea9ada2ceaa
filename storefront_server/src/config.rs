use std::env;

use chrono::Duration;
use log::*;
use storefront_common::{helpers::parse_boolean_flag, Secret};
use storefront_engine::{
    helpers::{WebhookVerifier, DEFAULT_SIGNATURE_TOLERANCE_SECS},
    StockPolicy,
};

const DEFAULT_SFS_HOST: &str = "127.0.0.1";
const DEFAULT_SFS_PORT: u16 = 8360;
const DEFAULT_SFS_DATABASE_URL: &str = "sqlite://data/storefront.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, the database is created if necessary and the schema migrations are run on start-up.
    pub run_migrations: bool,
    pub webhook: WebhookConfig,
    /// What to do when a paid cart asks for more than is in stock
    pub stock_policy: StockPolicy,
    /// Shared key that the seller panel presents in the `X-Seller-Key` header. If empty, the seller routes refuse every
    /// request.
    pub seller_api_key: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SFS_HOST.to_string(),
            port: DEFAULT_SFS_PORT,
            database_url: DEFAULT_SFS_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            webhook: WebhookConfig::default(),
            stock_policy: StockPolicy::default(),
            seller_api_key: Secret::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// The signing secret shared with the payment gateway
    pub secret: Secret<String>,
    /// If false, webhook signatures are not checked at all. **DANGER**. Local development only.
    pub signature_checks: bool,
    /// How far the signature timestamp may be from the current time
    pub tolerance: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: Secret::default(),
            signature_checks: true,
            tolerance: Duration::seconds(DEFAULT_SIGNATURE_TOLERANCE_SECS),
        }
    }
}

impl WebhookConfig {
    pub fn verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.secret.clone(), self.tolerance)
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SFS_HOST").ok().unwrap_or_else(|| DEFAULT_SFS_HOST.into());
        let port = env::var("SFS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SFS_PORT. {e} Using the default, {DEFAULT_SFS_PORT}, instead."
                    );
                    DEFAULT_SFS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SFS_PORT);
        let database_url = env::var("SFS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SFS_DATABASE_URL is not set. Using the default, {DEFAULT_SFS_DATABASE_URL}.");
            DEFAULT_SFS_DATABASE_URL.to_string()
        });
        let max_connections = env::var("SFS_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .or_else(|| {
                        warn!("🪛️ Invalid value for SFS_MAX_CONNECTIONS: {s}. Using {DEFAULT_MAX_CONNECTIONS}.");
                        None
                    })
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("SFS_RUN_MIGRATIONS").ok(), true);
        let webhook = WebhookConfig::from_env_or_defaults();
        let stock_policy = configure_stock_policy();
        let seller_api_key = env::var("SFS_SELLER_API_KEY").ok().unwrap_or_else(|| {
            warn!("🪛️ SFS_SELLER_API_KEY is not set. The seller routes will refuse all requests.");
            String::default()
        });
        Self {
            host,
            port,
            database_url,
            max_connections,
            run_migrations,
            webhook,
            stock_policy,
            seller_api_key: Secret::new(seller_api_key),
        }
    }
}

impl WebhookConfig {
    pub fn from_env_or_defaults() -> Self {
        let secret = env::var("SFS_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ SFS_WEBHOOK_SECRET is not set. Please set it to the signing secret of your payment gateway webhook."
            );
            String::default()
        });
        let signature_checks = parse_boolean_flag(env::var("SFS_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!(
                "🚨️🚨️🚨️ Webhook signature checks are DISABLED. Anyone can create orders. Never run production like \
                 this. 🚨️🚨️🚨️"
            );
        }
        let tolerance = env::var("SFS_SIGNATURE_TOLERANCE")
            .map_err(|_| {
                info!(
                    "🪛️ SFS_SIGNATURE_TOLERANCE is not set. Using the default value of {DEFAULT_SIGNATURE_TOLERANCE_SECS} \
                     seconds."
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SFS_SIGNATURE_TOLERANCE. {e}"))
                    .and_then(|secs| {
                        if secs > 0 {
                            Ok(Duration::seconds(secs))
                        } else {
                            warn!("🪛️ SFS_SIGNATURE_TOLERANCE must be positive. Ignoring {secs}.");
                            Err(())
                        }
                    })
            })
            .ok()
            .unwrap_or_else(|| Duration::seconds(DEFAULT_SIGNATURE_TOLERANCE_SECS));
        Self { secret: Secret::new(secret), signature_checks, tolerance }
    }
}

fn configure_stock_policy() -> StockPolicy {
    match env::var("SFS_OVERSELL_POLICY") {
        Ok(s) => s.parse().unwrap_or_else(|e| {
            warn!("🪛️ {e}. Using the default oversell policy, '{}'.", StockPolicy::default());
            StockPolicy::default()
        }),
        Err(_) => {
            info!("🪛️ SFS_OVERSELL_POLICY is not set. Using '{}'.", StockPolicy::default());
            StockPolicy::default()
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8360);
        assert_eq!(config.database_url, "sqlite://data/storefront.db");
        assert!(config.webhook.signature_checks);
        assert_eq!(config.webhook.tolerance, Duration::seconds(300));
        assert_eq!(config.stock_policy, StockPolicy::AllowOversell);
        assert!(config.seller_api_key.is_empty());
    }

    #[test]
    fn secrets_are_not_printed() {
        let mut config = ServerConfig::new("0.0.0.0", 9000);
        config.webhook.secret = Secret::new("whsec_very_secret".to_string());
        config.seller_api_key = Secret::new("seller-key".to_string());
        let printed = format!("{config:?}");
        assert!(!printed.contains("whsec_very_secret"));
        assert!(!printed.contains("seller-key"));
    }
}
