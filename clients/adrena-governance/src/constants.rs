use anchor_lang::prelude::Pubkey;

/// PDA seeds used by the Adrena program for account derivation
pub mod seeds {
    /// Seed for the global cortex account
    pub const CORTEX: &[u8] = b"cortex";

    /// Seed for the transfer authority PDA
    pub const TRANSFER_AUTHORITY: &[u8] = b"transfer_authority";

    /// Seed for the LM token mint
    pub const LM_TOKEN_MINT: &[u8] = b"lm_token_mint";

    /// Seed for the vest registry account
    pub const VEST_REGISTRY: &[u8] = b"vest_registry";

    /// Seed for a beneficiary's vest account, followed by the owner
    pub const VEST: &[u8] = b"vest";

    /// Seed for the governance token mint
    pub const GOVERNANCE_TOKEN_MINT: &[u8] = b"governance_token_mint";

    /// Seed for a pool account, followed by the pool name
    pub const POOL: &[u8] = b"pool";

    /// Seed for a pool's LP token mint, followed by the pool address
    pub const LP_TOKEN_MINT: &[u8] = b"lp_token_mint";

    /// Seed for a custody account, followed by the pool and the custody mint
    pub const CUSTODY: &[u8] = b"custody";

    /// Seed for a custody token account, followed by the pool and the custody mint
    pub const CUSTODY_TOKEN_ACCOUNT: &[u8] = b"custody_token_account";

    /// Seed for a pool's genesis lock account, followed by the pool address
    pub const GENESIS_LOCK: &[u8] = b"genesis_lock";

    /// SPL governance realm config seed, followed by the realm
    pub const REALM_CONFIG: &[u8] = b"realm-config";

    /// SPL governance seed prefix for token holdings and owner records
    pub const GOVERNANCE: &[u8] = b"governance";
}

/// SPL governance program used by the Adrena DAO
pub const GOVERNANCE_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw");

pub const TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

pub const SYSTEM_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("11111111111111111111111111111111");

pub const RENT_SYSVAR_ID: Pubkey =
    solana_sdk::pubkey!("SysvarRent111111111111111111111111111111111");

/// Maximum length of a single PDA seed
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of PDA seeds, bump seed included
pub const MAX_SEEDS: usize = 16;

/// Number of custody slots recorded by a pool
pub const MAX_CUSTODIES: usize = 10;

/// Maximum length of a pool name
pub const POOL_NAME_MAX_LEN: usize = 31;

/// Name of the pool created at program initialization
pub const MAIN_POOL_NAME: &str = "main-pool";

/// Number of decimals used for USD amounts
pub const USD_DECIMALS: u8 = 6;

/// Scale of the vote multiplier (10000 = x1)
pub const VOTE_MULTIPLIER_SCALE: u32 = 10_000;

/// Maximum possible value of basis points (100%)
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Position of the USDC custody in a pool, by convention the first registered
pub const USDC_CUSTODY_INDEX: usize = 0;

/// Pool custody slots funded during the genesis OTC
pub const GENESIS_CUSTODY_INDEXES: [usize; 3] = [1, 2, 3];
