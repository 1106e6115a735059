//! Configuration module for environment variables and command-line overrides

use std::env;
use std::time::Duration;

use anyhow::{ Result, anyhow };
use url::Url;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_CLUSTER: &str = "devnet";
/// 1 SOL
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON-RPC endpoint of the cluster
    pub rpc_url: String,

    /// Cluster label used in explorer links
    pub cluster: String,

    /// Lamports requested for the fee payer
    pub airdrop_lamports: u64,

    /// Airdrop visibility polling
    pub balance_poll: BalancePollConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancePollConfig {
    /// Maximum number of balance checks before giving up
    pub max_polls: usize,
    /// Initial delay between checks, grows exponentially
    pub initial_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            balance_poll: BalancePollConfig {
                max_polls: 30,
                initial_interval: Duration::from_millis(500),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            rpc_url: lookup("ECHO_RPC_URL").unwrap_or(defaults.rpc_url),

            cluster: lookup("ECHO_CLUSTER").unwrap_or(defaults.cluster),

            airdrop_lamports: parse_var(&lookup, "ECHO_AIRDROP_LAMPORTS")?
                .unwrap_or(defaults.airdrop_lamports),

            balance_poll: BalancePollConfig {
                max_polls: parse_var(&lookup, "ECHO_BALANCE_POLLS")?
                    .unwrap_or(defaults.balance_poll.max_polls),
                initial_interval: parse_var(&lookup, "ECHO_BALANCE_POLL_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.balance_poll.initial_interval),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        rpc_url: Option<String>,
        cluster: Option<String>,
        airdrop_lamports: Option<u64>,
    ) -> Result<Self> {
        if let Some(rpc_url) = rpc_url {
            self.rpc_url = rpc_url;
        }
        if let Some(cluster) = cluster {
            self.cluster = cluster;
        }
        if let Some(lamports) = airdrop_lamports {
            self.airdrop_lamports = lamports;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the flow cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.rpc_url)
            .map_err(|e| anyhow!("Invalid RPC URL '{}': {}", self.rpc_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("RPC URL must use http or https, got '{}'", url.scheme()));
        }
        if self.cluster.trim().is_empty() {
            return Err(anyhow!("Cluster name must not be empty"));
        }
        if self.airdrop_lamports == 0 {
            return Err(anyhow!("Airdrop amount must be greater than zero"));
        }
        if self.balance_poll.max_polls == 0 {
            return Err(anyhow!("ECHO_BALANCE_POLLS must be at least 1"));
        }
        if self.balance_poll.initial_interval.is_zero() {
            return Err(anyhow!("ECHO_BALANCE_POLL_MS must be greater than zero"));
        }
        Ok(())
    }

    /// Explorer link for a transaction signature
    pub fn explorer_url(&self, signature: &str) -> String {
        match self.cluster.as_str() {
            "mainnet-beta" => format!("https://explorer.solana.com/tx/{}", signature),
            "devnet" | "testnet" => format!(
                "https://explorer.solana.com/tx/{}?cluster={}",
                signature, self.cluster
            ),
            _ => {
                let custom_url: String =
                    url::form_urlencoded::byte_serialize(self.rpc_url.as_bytes()).collect();
                format!(
                    "https://explorer.solana.com/tx/{}?cluster=custom&customUrl={}",
                    signature, custom_url
                )
            }
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .replace('_', "")
                .parse::<T>()
                .map_err(|e| anyhow!("{} has invalid value '{}': {}", key, raw, e))
        })
        .transpose()
}
