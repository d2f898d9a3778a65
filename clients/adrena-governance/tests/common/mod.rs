#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use adrena_governance::client::{AccountFetcher, AdrenaClient, MirrorError, MirrorResult};
use adrena_governance::constants::{MAIN_POOL_NAME, MAX_CUSTODIES};
use adrena_governance::instructions::{ix_discriminator, BuildContext, Snapshots};
use adrena_governance::proposal::{
    deserialize_instruction_from_base64, Governance, GovernedAccount, UiInstruction,
};
use adrena_governance::state::{
    AdrenaAccount, Cortex, Custody, Keyed, LimitedString, Pool, Staking,
};
use anchor_lang::AnchorDeserialize;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

// ---------------------------------------------------------------------------
// In-memory account store
// ---------------------------------------------------------------------------

/// Accounts by address, with their owning program
#[derive(Default)]
pub struct MemoryFetcher {
    accounts: RwLock<BTreeMap<Pubkey, (Pubkey, Vec<u8>)>>,
    offline: AtomicBool,
}

impl MemoryFetcher {
    pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.write().unwrap().insert(address, (owner, data));
    }

    pub fn remove_account(&self, address: &Pubkey) {
        self.accounts.write().unwrap().remove(address);
    }

    /// Makes every call fail like an unreachable RPC node
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> MirrorResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(MirrorError::Rpc("connection refused".to_string()));
        }
        Ok(())
    }
}

impl AccountFetcher for MemoryFetcher {
    fn get_account_data(&self, address: &Pubkey) -> MirrorResult<Option<Vec<u8>>> {
        self.check_online()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .get(address)
            .map(|(_, data)| data.clone()))
    }

    fn get_multiple_account_data(
        &self,
        addresses: &[Pubkey],
    ) -> MirrorResult<Vec<Option<Vec<u8>>>> {
        addresses
            .iter()
            .map(|address| self.get_account_data(address))
            .collect()
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8; 8],
    ) -> MirrorResult<Vec<(Pubkey, Vec<u8>)>> {
        self.check_online()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .iter()
            .filter(|(_, (owner, data))| owner == program_id && data.starts_with(discriminator))
            .map(|(address, (_, data))| (*address, data.clone()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Test environment
// ---------------------------------------------------------------------------

pub struct TestEnv {
    pub fetcher: Arc<MemoryFetcher>,
    pub client: AdrenaClient,
    pub governed: GovernedAccount,
    pub payer: Pubkey,
}

pub fn setup() -> TestEnv {
    let _ = env_logger::builder().is_test(true).try_init();

    let program_id = Pubkey::new_unique();
    let fetcher = Arc::new(MemoryFetcher::default());
    let client = AdrenaClient::new(program_id, fetcher.clone());

    TestEnv {
        fetcher,
        client,
        governed: governed_account(program_id),
        payer: Pubkey::new_unique(),
    }
}

pub fn governed_account(program_id: Pubkey) -> GovernedAccount {
    GovernedAccount {
        pubkey: program_id,
        governance: Governance {
            pubkey: Pubkey::new_unique(),
            native_treasury_address: Pubkey::new_unique(),
        },
    }
}

impl TestEnv {
    pub fn program_id(&self) -> Pubkey {
        self.client.program_id()
    }

    pub fn admin(&self) -> Pubkey {
        self.governed.governance.native_treasury_address
    }

    pub fn ctx(&self) -> BuildContext<'_> {
        BuildContext::new(Some(&self.client), Some(self.payer))
    }

    pub fn write<T: AdrenaAccount>(&self, address: Pubkey, account: &T) {
        self.fetcher
            .set_account(address, self.program_id(), account.to_account_data());
    }

    pub fn add_cortex(&self, governance_realm: Pubkey) -> Cortex {
        let cortex = Cortex {
            lm_token_decimals: 6,
            governance_program: adrena_governance::constants::GOVERNANCE_PROGRAM_ID,
            governance_realm,
            pool_count: 1,
            ..Cortex::default()
        };
        self.write(self.client.pdas.cortex, &cortex);
        cortex
    }

    /// Pool named `name` with one custody per mint, in slot order
    pub fn add_pool(&self, name: &str, mints: &[Pubkey]) -> (Keyed<Pool>, Vec<Keyed<Custody>>) {
        let pdas = &self.client.pdas;
        let pool_address = pdas.pool(name).unwrap();

        let mut pool = Pool {
            allow_swap: true,
            allow_trade: true,
            liquidity_state: 2,
            registered_custody_count: mints.len() as u8,
            name: LimitedString::new(name),
            aum_soft_cap_usd: 1_000_000_000_000,
            ..Pool::default()
        };

        let mut custodies = Vec::new();
        for (slot, mint) in mints.iter().enumerate() {
            let address = pdas.custody(&pool_address, mint);
            let custody = custody_fixture(pool_address, *mint, slot);
            pool.custodies[slot] = address;
            pool.ratios[slot].target = 10_000 / mints.len().max(1) as u16;
            pool.ratios[slot].max = 10_000;

            self.write(address, &custody);
            custodies.push(Keyed::new(address, custody));
        }
        self.write(pool_address, &pool);

        (Keyed::new(pool_address, pool), custodies)
    }

    pub fn add_main_pool(&self, custody_count: usize) -> (Keyed<Pool>, Vec<Keyed<Custody>>) {
        let mints: Vec<Pubkey> = (0..custody_count).map(|_| Pubkey::new_unique()).collect();
        self.add_pool(MAIN_POOL_NAME, &mints)
    }

    pub fn add_staking(&self, staking_type: u8) -> Keyed<Staking> {
        let address = Pubkey::new_unique();
        let staking = Staking {
            staking_type,
            staked_token_decimals: 6,
            lm_emission_potentiometer_bps: 10_000,
            staked_token_mint: Pubkey::new_unique(),
            ..Staking::default()
        };
        self.write(address, &staking);
        Keyed::new(address, staking)
    }

    /// Snapshots as loaded by the mirror, custodies scoped to `pool`
    pub fn snapshots(&self, pool: Option<&Keyed<Pool>>) -> Snapshots {
        Snapshots {
            pools: Some(self.client.get_pools().unwrap()),
            custodies: pool.map(|pool| self.client.get_custodies(pool).unwrap()),
            stakings: Some(self.client.get_stakings().unwrap()),
        }
    }
}

pub fn custody_fixture(pool: Pubkey, mint: Pubkey, slot: usize) -> Custody {
    let mut custody = Custody {
        decimals: 6,
        is_stable: slot == 0,
        pool,
        mint,
        oracle: Pubkey::new_unique(),
        trade_oracle: Pubkey::new_unique(),
        ..Custody::default()
    };
    custody.pricing.max_initial_leverage = 1_000_000;
    custody.pricing.max_leverage = 1_000_000;
    custody.pricing.max_position_locked_usd = 100_000_000_000;
    custody.pricing.max_cumulative_short_position_size_usd = 500_000_000_000;
    custody.fees.swap_in = 15;
    custody.fees.fee_max = 150;
    custody.borrow_rate.max_hourly_borrow_interest_rate = 50_000;
    custody
}

pub fn full_pool_mints() -> Vec<Pubkey> {
    (0..MAX_CUSTODIES).map(|_| Pubkey::new_unique()).collect()
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

/// Decodes the governance payload of a valid result
pub fn decode(result: &UiInstruction) -> Instruction {
    assert!(result.is_valid, "instruction should be valid");
    deserialize_instruction_from_base64(&result.serialized_instruction).unwrap()
}

pub fn account_keys(ix: &Instruction) -> Vec<Pubkey> {
    ix.accounts.iter().map(|meta| meta.pubkey).collect()
}

/// Checks the discriminator of `name` and decodes the argument struct
pub fn decode_args<T: AnchorDeserialize>(ix: &Instruction, name: &str) -> T {
    assert_eq!(ix.data[..8], ix_discriminator(name), "discriminator of {}", name);
    T::try_from_slice(&ix.data[8..]).unwrap()
}

pub fn assert_invalid(result: &UiInstruction) {
    assert!(!result.is_valid, "instruction should be invalid");
    assert!(result.serialized_instruction.is_empty());
    assert!(result.prerequisite_instructions.is_empty());
}
