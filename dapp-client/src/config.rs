use crate::{
    contracts::DEFAULT_DATA_STORE_ADDRESS,
    error::{DappError, Result},
};
use alloy_primitives::{Address, FixedBytes};
use alloy_signer_local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    pub wallet: WalletConfig,
    pub events: EventConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Chain the node must report before a session is established. `None`
    /// accepts whatever chain the node is on.
    pub chain_id: Option<u64>,
    pub rpc_url: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// `None` leaves the contract panel unbound; save and get then fail.
    pub data_store: Option<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Hex private key. Without one, the node's own accounts sign.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub enable_event_monitoring: bool,
    pub poll_interval_ms: u64,
}

impl Config {
    /// Builds a config from a key lookup, usually the process environment
    /// layered under command line flags.
    pub fn from_source(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network_name = var("ETHEREUM_NETWORK").unwrap_or_else(|| "custom".to_string());
        let chain_id = match var("CHAIN_ID").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| DappError::Config(format!("Invalid chain ID: {e}")))?,
            ),
            None => Self::known_chain_id(&network_name),
        };

        let rpc_url = var("ETHEREUM_RPC_URL")
            .ok_or_else(|| DappError::Config("ETHEREUM_RPC_URL is required".to_string()))?;
        let rpc_url = Url::parse(&rpc_url)
            .map_err(|e| DappError::Config(format!("Invalid ETHEREUM_RPC_URL: {e}")))?;

        let data_store = match var("DATA_STORE_ADDRESS") {
            None => Some(DEFAULT_DATA_STORE_ADDRESS),
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().parse::<Address>().map_err(|e| {
                DappError::InvalidAddress(format!("Invalid data store address: {e}"))
            })?),
        };

        let private_key = var("ETHEREUM_WALLET_PRIVATE_KEY").filter(|key| !key.trim().is_empty());
        if let Some(key) = &private_key {
            Self::parse_private_key(key)?;
        }

        Ok(Self {
            network: NetworkConfig {
                name: network_name,
                chain_id,
                rpc_url,
            },
            contract: ContractConfig { data_store },
            wallet: WalletConfig { private_key },
            events: EventConfig {
                enable_event_monitoring: var("ENABLE_EVENT_MONITORING")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
                poll_interval_ms: var("EVENT_POLL_INTERVAL_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            },
        })
    }

    /// Parses a hex private key, with or without `0x`.
    pub fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
        let bytes = hex::decode(key.trim().trim_start_matches("0x"))?;
        PrivateKeySigner::from_bytes(&FixedBytes::<32>::try_from(bytes.as_slice())?)
            .map_err(|e| DappError::Signer(e.to_string()))
    }

    /// Chain id for a network name, when the name is a well-known one.
    fn known_chain_id(network: &str) -> Option<u64> {
        match network {
            "mainnet" => Some(1),
            "sepolia" => Some(11_155_111),
            "holesky" => Some(17000),
            "local" | "anvil" | "hardhat" => Some(31337),
            _ => None,
        }
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.events.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.network.rpc_url.scheme(), "http" | "https") {
            return Err(DappError::Config(
                "ETHEREUM_RPC_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.contract.data_store == Some(Address::ZERO) {
            return Err(DappError::Config(
                "Data store address must not be the zero address".to_string(),
            ));
        }

        if self.events.poll_interval_ms == 0 {
            return Err(DappError::Config(
                "Event poll interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let rpc_url = Url::parse("http://localhost:8545").expect("static URL is valid");
        Self {
            network: NetworkConfig {
                name: "local".to_string(),
                chain_id: Some(31337),
                rpc_url,
            },
            contract: ContractConfig {
                data_store: Some(DEFAULT_DATA_STORE_ADDRESS),
            },
            wallet: WalletConfig::default(),
            events: EventConfig {
                enable_event_monitoring: true,
                poll_interval_ms: 1000,
            },
        }
    }
}
