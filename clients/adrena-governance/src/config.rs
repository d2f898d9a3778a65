use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use serde::Deserialize;
use solana_client::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use thiserror::Error;

use crate::client::{AccountFetcher, AdrenaClient};
use crate::constants::GOVERNANCE_PROGRAM_ID;

cfg_if::cfg_if! {
    if #[cfg(feature = "devnet")] {
        pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
    } else {
        pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
    }
}

pub const DEFAULT_COMMITMENT: &str = "confirmed";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid address for `{field}`: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Unknown commitment level: {0}")]
    InvalidCommitment(String),
}

/// On-disk shape of the config, addresses as base58 strings
#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    rpc_url: Option<String>,
    commitment: Option<String>,
    governance_program_id: Option<String>,
    program_id: Option<String>,
}

/// Connection settings of the governance client
///
/// `program_id` is only set when the deployment to govern is pinned in the
/// config. Otherwise it comes from the governed account selected in a form.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub governance_program_id: Pubkey,
    pub program_id: Option<Pubkey>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            governance_program_id: GOVERNANCE_PROGRAM_ID,
            program_id: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;

        let commitment = raw.commitment.as_deref().unwrap_or(DEFAULT_COMMITMENT);
        let commitment = CommitmentConfig::from_str(commitment)
            .map_err(|_| ConfigError::InvalidCommitment(commitment.to_string()))?;

        let governance_program_id = match raw.governance_program_id {
            Some(value) => parse_address("governance_program_id", value)?,
            None => GOVERNANCE_PROGRAM_ID,
        };
        let program_id = raw
            .program_id
            .map(|value| parse_address("program_id", value))
            .transpose()?;

        Ok(Self {
            rpc_url: raw.rpc_url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            commitment,
            governance_program_id,
            program_id,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), self.commitment)
    }

    /// Client of `program_id` deriving DAO accounts under the configured
    /// governance program
    pub fn adrena_client(
        &self,
        program_id: Pubkey,
        fetcher: Arc<dyn AccountFetcher + Send + Sync>,
    ) -> AdrenaClient {
        AdrenaClient::new(program_id, fetcher).with_governance_program(self.governance_program_id)
    }
}

fn parse_address(field: &'static str, value: String) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();

        assert_eq!(config, ClientConfig::default());
        assert!(config.program_id.is_none());
    }

    #[test]
    fn test_full_config() {
        let program_id = Pubkey::new_unique();
        let source = format!(
            r#"
            rpc_url = "http://localhost:8899"
            commitment = "finalized"
            program_id = "{}"
            "#,
            program_id
        );

        let config = ClientConfig::from_toml_str(&source).unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.commitment, CommitmentConfig::finalized());
        assert_eq!(config.program_id, Some(program_id));
        assert_eq!(config.governance_program_id, GOVERNANCE_PROGRAM_ID);
    }

    #[test]
    fn test_governance_program_reaches_client() {
        let governance_program_id = Pubkey::new_unique();
        let source = format!("governance_program_id = \"{}\"", governance_program_id);
        let config = ClientConfig::from_toml_str(&source).unwrap();
        let fetcher: Arc<dyn AccountFetcher + Send + Sync> = Arc::new(config.rpc_client());

        let client = config.adrena_client(Pubkey::new_unique(), fetcher);

        assert_eq!(client.pdas.governance_program_id, governance_program_id);
        let realm = Pubkey::new_unique();
        assert_eq!(
            client.pdas.governance_realm_config(&realm),
            Pubkey::find_program_address(&[b"realm-config", realm.as_ref()], &governance_program_id).0
        );
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            ClientConfig::from_toml_str("program_id = \"nope\""),
            Err(ConfigError::InvalidAddress { field: "program_id", .. })
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("commitment = \"eventually\""),
            Err(ConfigError::InvalidCommitment(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("unknown = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
