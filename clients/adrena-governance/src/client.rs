use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use solana_account_decoder_client_types::{UiAccountData, UiAccountEncoding};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use thiserror::Error;

use crate::pda::AdrenaPdas;
use crate::state::{AdrenaAccount, Cortex, CustodySlot, Keyed, Pool, Staking};

/// Failures of the account mirror
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Account {address} is not a valid {name} account: {reason}")]
    InvalidAccount {
        name: &'static str,
        address: Pubkey,
        reason: String,
    },

    #[error("RPC returned {returned} accounts for {requested} addresses")]
    LengthMismatch { requested: usize, returned: usize },

    #[error("RPC returned account {0} in an unexpected encoding")]
    UnexpectedEncoding(Pubkey),
}

impl From<solana_client::client_error::ClientError> for MirrorError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        MirrorError::Rpc(err.to_string())
    }
}

pub type MirrorResult<T> = std::result::Result<T, MirrorError>;

/// Read-only access to on-chain account data
///
/// This is the network seam of the crate: the RPC implementation performs a
/// round trip per call, tests plug in an in-memory map.
pub trait AccountFetcher {
    /// Data of the account at `address`, `None` when it does not exist
    fn get_account_data(&self, address: &Pubkey) -> MirrorResult<Option<Vec<u8>>>;

    /// Data of each account in `addresses`, in the same order
    fn get_multiple_account_data(&self, addresses: &[Pubkey])
        -> MirrorResult<Vec<Option<Vec<u8>>>>;

    /// All accounts owned by `program_id` whose data starts with `discriminator`
    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8; 8],
    ) -> MirrorResult<Vec<(Pubkey, Vec<u8>)>>;
}

impl AccountFetcher for RpcClient {
    fn get_account_data(&self, address: &Pubkey) -> MirrorResult<Option<Vec<u8>>> {
        let response = self.get_account_with_commitment(address, self.commitment())?;
        Ok(response.value.map(|account| account.data))
    }

    fn get_multiple_account_data(
        &self,
        addresses: &[Pubkey],
    ) -> MirrorResult<Vec<Option<Vec<u8>>>> {
        let accounts = self.get_multiple_accounts(addresses)?;
        Ok(accounts
            .into_iter()
            .map(|account| account.map(|account| account.data))
            .collect())
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8; 8],
    ) -> MirrorResult<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                0,
                discriminator.to_vec(),
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let accounts = self.get_program_ui_accounts_with_config(program_id, config)?;
        accounts
            .into_iter()
            .map(|(address, account)| {
                let data = ui_account_bytes(&account.data)
                    .ok_or(MirrorError::UnexpectedEncoding(address))?;
                Ok((address, data))
            })
            .collect()
    }
}

/// Raw bytes of base64 encoded RPC account data
fn ui_account_bytes(data: &UiAccountData) -> Option<Vec<u8>> {
    match data {
        UiAccountData::Binary(blob, UiAccountEncoding::Base64) => STANDARD.decode(blob).ok(),
        _ => None,
    }
}

/// Client for one deployed Adrena program instance
///
/// Holds the program's derived addresses and fetches typed account snapshots.
/// Nothing is cached: every `get_*` call is a fresh round trip.
#[derive(Clone)]
pub struct AdrenaClient {
    pub pdas: AdrenaPdas,
    fetcher: Arc<dyn AccountFetcher + Send + Sync>,
}

impl AdrenaClient {
    pub fn new(program_id: Pubkey, fetcher: Arc<dyn AccountFetcher + Send + Sync>) -> Self {
        debug!("Creating Adrena client for program {}", program_id);
        Self {
            pdas: AdrenaPdas::new(program_id),
            fetcher,
        }
    }

    /// Targets an SPL governance deployment other than the default one
    pub fn with_governance_program(mut self, governance_program_id: Pubkey) -> Self {
        self.pdas = self.pdas.with_governance_program(governance_program_id);
        self
    }

    pub fn program_id(&self) -> Pubkey {
        self.pdas.program_id
    }

    pub fn get_cortex(&self) -> MirrorResult<Cortex> {
        let address = self.pdas.cortex;
        let data = self
            .fetcher
            .get_account_data(&address)?
            .ok_or(MirrorError::AccountNotFound(address))?;

        decode::<Cortex>(&address, &data)
    }

    pub fn get_pools(&self) -> MirrorResult<Vec<Keyed<Pool>>> {
        self.get_all::<Pool>()
    }

    /// Custody accounts of `pool`, one entry per recorded slot
    ///
    /// The result has exactly the pool's slot count and order. Empty slots
    /// (zero address) and missing accounts come back with `custody: None`;
    /// an account that exists but does not decode as a custody is an error.
    pub fn get_custodies(&self, pool: &Keyed<Pool>) -> MirrorResult<Vec<CustodySlot>> {
        let addresses = &pool.account.custodies;
        let accounts = self.fetcher.get_multiple_account_data(addresses)?;

        if accounts.len() != addresses.len() {
            return Err(MirrorError::LengthMismatch {
                requested: addresses.len(),
                returned: accounts.len(),
            });
        }

        addresses
            .iter()
            .zip(accounts)
            .map(|(address, data)| {
                let custody = match data {
                    Some(data) if *address != Pubkey::default() => {
                        Some(decode(address, &data)?)
                    }
                    _ => None,
                };

                Ok(CustodySlot {
                    pubkey: *address,
                    custody,
                })
            })
            .collect()
    }

    pub fn get_stakings(&self) -> MirrorResult<Vec<Keyed<Staking>>> {
        self.get_all::<Staking>()
    }

    pub fn account_exists(&self, address: &Pubkey) -> MirrorResult<bool> {
        Ok(self.fetcher.get_account_data(address)?.is_some())
    }

    fn get_all<T: AdrenaAccount>(&self) -> MirrorResult<Vec<Keyed<T>>> {
        let accounts = self
            .fetcher
            .get_program_accounts(&self.pdas.program_id, &T::discriminator())?;
        debug!("Fetched {} {} accounts", accounts.len(), T::NAME);

        accounts
            .into_iter()
            .map(|(address, data)| Ok(Keyed::new(address, decode::<T>(&address, &data)?)))
            .collect()
    }
}

fn decode<T: AdrenaAccount>(address: &Pubkey, data: &[u8]) -> MirrorResult<T> {
    T::try_from_account_data(data).map_err(|err| {
        warn!("Failed to decode {} account {}: {}", T::NAME, address, err);
        MirrorError::InvalidAccount {
            name: T::NAME,
            address: *address,
            reason: err.to_string(),
        }
    })
}

/// Client for the selected program, or `None` while no program is selected
pub fn use_adrena_client(
    program_id: Option<Pubkey>,
    fetcher: Arc<dyn AccountFetcher + Send + Sync>,
) -> Option<AdrenaClient> {
    program_id.map(|program_id| AdrenaClient::new(program_id, fetcher))
}

/// Pools of the client's program; `Ok(None)` while there is no client
pub fn use_pools(client: Option<&AdrenaClient>) -> MirrorResult<Option<Vec<Keyed<Pool>>>> {
    client.map(AdrenaClient::get_pools).transpose()
}

/// Custodies of the selected pool; `Ok(None)` until both client and pool are
/// available, so "pools not loaded" never reads as "pool without custodies"
pub fn use_custodies(
    client: Option<&AdrenaClient>,
    pool: Option<&Keyed<Pool>>,
) -> MirrorResult<Option<Vec<CustodySlot>>> {
    match (client, pool) {
        (Some(client), Some(pool)) => client.get_custodies(pool).map(Some),
        _ => Ok(None),
    }
}

/// Staking accounts of the client's program; `Ok(None)` while there is no client
pub fn use_stakings(client: Option<&AdrenaClient>) -> MirrorResult<Option<Vec<Keyed<Staking>>>> {
    client.map(AdrenaClient::get_stakings).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_account_bytes_decodes_base64_only() {
        let encoded = UiAccountData::Binary(STANDARD.encode([1, 2, 3]), UiAccountEncoding::Base64);
        assert_eq!(ui_account_bytes(&encoded), Some(vec![1, 2, 3]));

        let base58 = UiAccountData::Binary("2VfUX".to_string(), UiAccountEncoding::Base58);
        assert_eq!(ui_account_bytes(&base58), None);
        assert_eq!(ui_account_bytes(&UiAccountData::LegacyBinary("2VfUX".to_string())), None);
    }
}
