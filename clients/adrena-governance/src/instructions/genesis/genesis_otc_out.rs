use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::{TOKEN_PROGRAM_ID, USDC_CUSTODY_INDEX};
use crate::forms::{InstructionInput, Schema};
use crate::instructions::{
    pool_input, AdrenaInstruction, BuildContext, BuiltInstruction, InstructionBuilder,
    InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::utils::get_associated_token_address;

/// `genesis_otc_out` takes no arguments
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisOtcOutParams {}

impl InstructionPayload for GenesisOtcOutParams {
    const NAME: &'static str = "genesis_otc_out";
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenesisOtcOutForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
}

/// Withdraws the genesis USDC of a pool into the DAO treasury
pub struct GenesisOtcOut;

impl InstructionBuilder for GenesisOtcOut {
    type Form = GenesisOtcOutForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::GenesisOtcOut;

    fn governed_account(form: &Self::Form) -> Option<&GovernedAccount> {
        form.governed_account.as_ref()
    }

    fn schema() -> Schema<Self::Form> {
        Schema::<Self::Form>::new()
            .rule(
                "governedAccount",
                "Program governed account is required",
                |f| f.governed_account.is_some(),
            )
            .rule("pool", "Pool is required", |f| f.pool.is_some())
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
        ]
    }

    fn has_account_data(_form: &Self::Form, snapshots: &Snapshots) -> bool {
        snapshots.pools.is_some() && snapshots.custodies.is_some()
    }

    fn build(
        form: &Self::Form,
        snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction> {
        let client = ctx.client_for(governed)?;
        let payer = ctx.payer()?;
        let pdas = &client.pdas;
        let pool = snapshots.require_pool(form.pool)?;
        // USDC is the first custody registered in a pool
        let custody_usdc =
            snapshots.require_custody(pool, Some(pool.account.custodies[USDC_CUSTODY_INDEX]))?;
        let usdc_mint = custody_usdc.account.mint;
        let admin = governed.governance.native_treasury_address;

        Ok(Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(admin, true),
                AccountMeta::new(pdas.cortex, false),
                AccountMeta::new(pool.pubkey, false),
                AccountMeta::new(pdas.genesis_lock(&pool.pubkey), false),
                AccountMeta::new(payer, true),
                AccountMeta::new(custody_usdc.pubkey, false),
                AccountMeta::new(pdas.custody_token_account(&pool.pubkey, &usdc_mint), false),
                AccountMeta::new(get_associated_token_address(&admin, &usdc_mint), false),
                AccountMeta::new_readonly(pdas.transfer_authority, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: GenesisOtcOutParams::default().data(),
        }
        .into())
    }
}
