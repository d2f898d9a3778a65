use anchor_lang::prelude::*;
use solana_sdk::hash::hash;

use crate::constants::{MAX_CUSTODIES, POOL_NAME_MAX_LEN};

/// Returns the 8-byte Anchor discriminator `sha256("<namespace>:<name>")[..8]`
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{}:{}", namespace, name);
    let digest = hash(preimage.as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest.to_bytes()[..8]);
    discriminator
}

#[error_code]
pub enum AccountErrorCode {
    #[msg("Account data is shorter than the discriminator")]
    AccountDiscriminatorNotFound,
    #[msg("Account discriminator does not match the expected account type")]
    AccountDiscriminatorMismatch,
    #[msg("Failed to deserialize the account body")]
    AccountDidNotDeserialize,
}

/// An Adrena-owned account mirrored from chain
///
/// Layout is the Anchor one: an 8-byte discriminator derived from the account
/// type name, followed by the borsh-encoded body. Trailing bytes (reserved
/// space) are ignored when decoding.
pub trait AdrenaAccount: AnchorSerialize + AnchorDeserialize {
    /// Anchor account name, e.g. `"Pool"`
    const NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        anchor_discriminator("account", Self::NAME)
    }

    fn try_from_account_data(data: &[u8]) -> Result<Self> {
        require!(data.len() >= 8, AccountErrorCode::AccountDiscriminatorNotFound);
        require!(
            data[..8] == Self::discriminator(),
            AccountErrorCode::AccountDiscriminatorMismatch
        );

        let mut body = &data[8..];
        Self::deserialize(&mut body).map_err(|_| error!(AccountErrorCode::AccountDidNotDeserialize))
    }

    fn to_account_data(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        // Writing into a Vec cannot fail
        let _ = self.serialize(&mut data);
        data
    }
}

/// A mirrored account together with its address
#[derive(Clone, Debug, PartialEq)]
pub struct Keyed<T> {
    pub pubkey: Pubkey,
    pub account: T,
}

impl<T> Keyed<T> {
    pub fn new(pubkey: Pubkey, account: T) -> Self {
        Self { pubkey, account }
    }
}

/// One slot of a pool's custody list, in pool order
///
/// `custody` is `None` for empty (zero address) slots and for addresses whose
/// account could not be found.
#[derive(Clone, Debug, PartialEq)]
pub struct CustodySlot {
    pub pubkey: Pubkey,
    pub custody: Option<Custody>,
}

impl CustodySlot {
    pub fn is_empty(&self) -> bool {
        self.pubkey == Pubkey::default()
    }

    pub fn keyed(&self) -> Option<Keyed<Custody>> {
        self.custody
            .clone()
            .map(|custody| Keyed::new(self.pubkey, custody))
    }
}

/// Origin bucket of LM tokens released through vests and bucket mints
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OriginBucket {
    CoreContributor,
    Foundation,
    #[default]
    Ecosystem,
}

impl OriginBucket {
    pub const ALL: [OriginBucket; 3] = [
        OriginBucket::CoreContributor,
        OriginBucket::Foundation,
        OriginBucket::Ecosystem,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OriginBucket::CoreContributor => "Core Contributor",
            OriginBucket::Foundation => "Foundation",
            OriginBucket::Ecosystem => "Ecosystem",
        }
    }
}

/// Liquidity lifecycle of a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LiquidityState {
    GenesisLiquidity,
    Idle,
    #[default]
    Active,
}

impl LiquidityState {
    pub const ALL: [LiquidityState; 3] = [
        LiquidityState::GenesisLiquidity,
        LiquidityState::Idle,
        LiquidityState::Active,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LiquidityState::GenesisLiquidity => "Genesis Liquidity",
            LiquidityState::Idle => "Idle",
            LiquidityState::Active => "Active",
        }
    }
}

/// Fixed-capacity string stored inline in accounts
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LimitedString {
    pub value: [u8; POOL_NAME_MAX_LEN],
    pub length: u8,
}

impl LimitedString {
    /// Truncates `s` to the inline capacity
    pub fn new(s: &str) -> Self {
        let bytes = s.as_bytes();
        let length = bytes.len().min(POOL_NAME_MAX_LEN);
        let mut value = [0u8; POOL_NAME_MAX_LEN];
        value[..length].copy_from_slice(&bytes[..length]);
        Self {
            value,
            length: length as u8,
        }
    }

    pub fn to_string_lossy(&self) -> String {
        let length = (self.length as usize).min(POOL_NAME_MAX_LEN);
        String::from_utf8_lossy(&self.value[..length]).into_owned()
    }
}

/// Target, min and max share of a custody in its pool, in basis points
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenRatios {
    pub target: u16,
    pub min: u16,
    pub max: u16,
    pub padding: [u8; 2],
}

/// Leverage and size limits of a custody
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PricingParams {
    /// 10000 = x1
    pub max_initial_leverage: u32,
    /// 10000 = x1
    pub max_leverage: u32,
    /// USD with 6 decimals
    pub max_position_locked_usd: u64,
    /// USD with 6 decimals
    pub max_cumulative_short_position_size_usd: u64,
}

/// Fee schedule of a custody, in basis points
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Fees {
    pub swap_in: u16,
    pub swap_out: u16,
    pub stable_swap_in: u16,
    pub stable_swap_out: u16,
    pub add_liquidity: u16,
    pub remove_liquidity: u16,
    pub close_position: u16,
    pub liquidation: u16,
    pub fee_max: u16,
    pub padding: [u8; 2],
    pub padding2: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BorrowRateParams {
    /// 0.008% = 80000
    pub max_hourly_borrow_interest_rate: u64,
}

/// Global configuration of the Adrena program
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Cortex {
    pub bump: u8,
    pub transfer_authority_bump: u8,
    pub lm_token_bump: u8,
    pub governance_token_bump: u8,
    pub lm_token_decimals: u8,
    /// SPL governance program hosting the DAO
    pub governance_program: Pubkey,
    /// Realm the governance token is registered in
    pub governance_realm: Pubkey,
    pub core_contributor_bucket_allocation: u64,
    pub foundation_bucket_allocation: u64,
    pub ecosystem_bucket_allocation: u64,
    pub core_contributor_bucket_vested_amount: u64,
    pub core_contributor_bucket_minted_amount: u64,
    pub foundation_bucket_vested_amount: u64,
    pub foundation_bucket_minted_amount: u64,
    pub ecosystem_bucket_vested_amount: u64,
    pub ecosystem_bucket_minted_amount: u64,
    pub pool_count: u8,
}

impl AdrenaAccount for Cortex {
    const NAME: &'static str = "Cortex";
}

/// A liquidity pool and its custody slots
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Pool {
    pub bump: u8,
    pub lp_token_bump: u8,
    pub allow_trade: bool,
    pub allow_swap: bool,
    pub liquidity_state: u8,
    pub registered_custody_count: u8,
    pub name: LimitedString,
    /// Custody addresses in slot order, zero address for empty slots
    pub custodies: [Pubkey; MAX_CUSTODIES],
    pub ratios: [TokenRatios; MAX_CUSTODIES],
    /// USD with 6 decimals
    pub aum_usd: u128,
    /// USD with 6 decimals
    pub aum_soft_cap_usd: u64,
    pub inception_time: i64,
}

impl AdrenaAccount for Pool {
    const NAME: &'static str = "Pool";
}

impl Pool {
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy()
    }

    /// Index of the first empty custody slot, where the next custody lands
    pub fn first_empty_custody_slot(&self) -> Option<usize> {
        self.custodies
            .iter()
            .position(|custody| *custody == Pubkey::default())
    }
}

/// One collateral asset held by a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Custody {
    pub bump: u8,
    pub token_account_bump: u8,
    pub allow_trade: bool,
    pub allow_swap: bool,
    pub decimals: u8,
    pub is_stable: bool,
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub oracle: Pubkey,
    pub trade_oracle: Pubkey,
    pub pricing: PricingParams,
    pub fees: Fees,
    pub borrow_rate: BorrowRateParams,
}

impl AdrenaAccount for Custody {
    const NAME: &'static str = "Custody";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Staking {
    /// 0 = LM, 1 = LP
    pub staking_type: u8,
    pub bump: u8,
    pub staked_token_vault_bump: u8,
    pub staked_token_decimals: u8,
    pub lm_emission_potentiometer_bps: u16,
    pub staked_token_mint: Pubkey,
    pub nb_locked_tokens: u64,
}

impl AdrenaAccount for Staking {
    const NAME: &'static str = "Staking";
}
