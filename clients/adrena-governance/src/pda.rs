use anchor_lang::prelude::*;

use crate::constants::{seeds, GOVERNANCE_PROGRAM_ID, MAX_SEEDS, MAX_SEED_LEN};
use crate::utils::get_associated_token_address;

/// Error codes for address derivation
#[error_code]
pub enum PdaErrorCode {
    /// A seed is longer than 32 bytes or too many seeds were given
    #[msg("Seed list exceeds the maximum seed length")]
    InvalidSeedLength,
}

/// Derives the canonical program address for `seeds` under `program_id`
///
/// The bump search is delegated to `Pubkey::find_program_address`, which
/// walks bumps down from 255 until the candidate falls off the ed25519 curve.
/// Seed lists that the runtime would reject are reported instead of panicking.
///
/// # Errors
/// * `PdaErrorCode::InvalidSeedLength` - If a seed exceeds 32 bytes or more than
///   15 seeds are given (the bump seed takes the 16th slot)
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
    derive_with_bump(seeds, program_id).map(|(address, _)| address)
}

/// Same as [`derive`], also returning the bump seed
pub fn derive_with_bump(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    require!(seeds.len() < MAX_SEEDS, PdaErrorCode::InvalidSeedLength);
    require!(
        seeds.iter().all(|seed| seed.len() <= MAX_SEED_LEN),
        PdaErrorCode::InvalidSeedLength
    );

    Ok(Pubkey::find_program_address(seeds, program_id))
}

/// Addresses of one deployed Adrena program instance
///
/// Singleton addresses only depend on static seeds and are computed once at
/// construction; per-entity addresses are recomputed on each call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdrenaPdas {
    pub program_id: Pubkey,
    pub cortex: Pubkey,
    pub transfer_authority: Pubkey,
    pub lm_token_mint: Pubkey,
    pub vest_registry: Pubkey,
    pub governance_token_mint: Pubkey,
    /// SPL governance program hosting the DAO realm
    pub governance_program_id: Pubkey,
}

impl AdrenaPdas {
    pub fn new(program_id: Pubkey) -> Self {
        let singleton = |seed: &[u8]| Pubkey::find_program_address(&[seed], &program_id).0;

        Self {
            program_id,
            cortex: singleton(seeds::CORTEX),
            transfer_authority: singleton(seeds::TRANSFER_AUTHORITY),
            lm_token_mint: singleton(seeds::LM_TOKEN_MINT),
            vest_registry: singleton(seeds::VEST_REGISTRY),
            governance_token_mint: singleton(seeds::GOVERNANCE_TOKEN_MINT),
            governance_program_id: GOVERNANCE_PROGRAM_ID,
        }
    }

    pub fn with_governance_program(mut self, governance_program_id: Pubkey) -> Self {
        self.governance_program_id = governance_program_id;
        self
    }

    /// Pool account for `name`
    ///
    /// # Errors
    /// * `PdaErrorCode::InvalidSeedLength` - If the name is longer than 32 bytes
    pub fn pool(&self, name: &str) -> Result<Pubkey> {
        derive(&[seeds::POOL, name.as_bytes()], &self.program_id)
    }

    pub fn lp_token_mint(&self, pool: &Pubkey) -> Pubkey {
        self.find(&[seeds::LP_TOKEN_MINT, pool.as_ref()])
    }

    /// Vest record of a beneficiary
    pub fn vest(&self, owner: &Pubkey) -> Pubkey {
        self.find(&[seeds::VEST, owner.as_ref()])
    }

    pub fn custody(&self, pool: &Pubkey, mint: &Pubkey) -> Pubkey {
        self.find(&[seeds::CUSTODY, pool.as_ref(), mint.as_ref()])
    }

    pub fn custody_token_account(&self, pool: &Pubkey, mint: &Pubkey) -> Pubkey {
        self.find(&[seeds::CUSTODY_TOKEN_ACCOUNT, pool.as_ref(), mint.as_ref()])
    }

    pub fn genesis_lock(&self, pool: &Pubkey) -> Pubkey {
        self.find(&[seeds::GENESIS_LOCK, pool.as_ref()])
    }

    /// SPL governance realm config of `realm`
    pub fn governance_realm_config(&self, realm: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[seeds::REALM_CONFIG, realm.as_ref()],
            &self.governance_program_id,
        )
        .0
    }

    /// Realm holding account for the Adrena governance token
    pub fn governing_token_holding(&self, realm: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[
                seeds::GOVERNANCE,
                realm.as_ref(),
                self.governance_token_mint.as_ref(),
            ],
            &self.governance_program_id,
        )
        .0
    }

    /// Token owner record of `owner` in `realm` for the Adrena governance token
    pub fn governing_token_owner_record(&self, realm: &Pubkey, owner: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[
                seeds::GOVERNANCE,
                realm.as_ref(),
                self.governance_token_mint.as_ref(),
                owner.as_ref(),
            ],
            &self.governance_program_id,
        )
        .0
    }

    /// Associated LM token account of `owner`
    pub fn lm_token_account(&self, owner: &Pubkey) -> Pubkey {
        get_associated_token_address(owner, &self.lm_token_mint)
    }

    // Every caller passes pubkey-sized seeds behind a short static prefix.
    fn find(&self, seeds: &[&[u8]]) -> Pubkey {
        Pubkey::find_program_address(seeds, &self.program_id).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_matches_find_program_address() {
        let program_id = Pubkey::new_unique();
        let expected = Pubkey::find_program_address(&[b"cortex"], &program_id).0;

        assert_eq!(derive(&[b"cortex"], &program_id).unwrap(), expected);
        assert_eq!(AdrenaPdas::new(program_id).cortex, expected);
    }

    #[test]
    fn test_derive_rejects_long_seed() {
        let program_id = Pubkey::new_unique();
        let long_seed = [7u8; MAX_SEED_LEN + 1];

        assert!(derive(&[&long_seed], &program_id).is_err());
        assert!(derive(&[&long_seed[..MAX_SEED_LEN]], &program_id).is_ok());
    }

    #[test]
    fn test_derive_rejects_too_many_seeds() {
        let program_id = Pubkey::new_unique();
        let seed: &[u8] = b"s";

        assert!(derive(&[seed; MAX_SEEDS], &program_id).is_err());
        assert!(derive(&[seed; MAX_SEEDS - 1], &program_id).is_ok());
    }

    #[test]
    fn test_pool_name_too_long() {
        let pdas = AdrenaPdas::new(Pubkey::new_unique());

        assert!(pdas.pool("main-pool").is_ok());
        assert!(pdas.pool(&"x".repeat(33)).is_err());
    }
}
