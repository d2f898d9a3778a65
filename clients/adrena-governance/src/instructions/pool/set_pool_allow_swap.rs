use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::{MAIN_POOL_NAME, POOL_NAME_MAX_LEN};
use crate::forms::{InstructionInput, Schema};
use crate::instructions::{
    AdrenaInstruction, BuildContext, BuiltInstruction, InstructionBuilder, InstructionPayload,
    Snapshots,
};
use crate::proposal::GovernedAccount;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetPoolAllowSwapParams {
    pub allow_swap: bool,
}

impl InstructionPayload for SetPoolAllowSwapParams {
    const NAME: &'static str = "set_pool_allow_swap";
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetPoolAllowSwapForm {
    pub governed_account: Option<GovernedAccount>,
    /// Name of the pool, the pool address is derived from it
    pub pool_name: String,
    pub allow: bool,
}

impl Default for SetPoolAllowSwapForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            pool_name: MAIN_POOL_NAME.to_string(),
            allow: false,
        }
    }
}

/// Enables or disables swaps on a pool
pub struct SetPoolAllowSwap;

impl InstructionBuilder for SetPoolAllowSwap {
    type Form = SetPoolAllowSwapForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetPoolAllowSwap;

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
            .rule("poolName", "Pool name is required", |f| {
                !f.pool_name.trim().is_empty()
            })
            .rule("poolName", "Pool name is too long", |f| {
                f.pool_name.len() <= POOL_NAME_MAX_LEN
            })
    }

    fn inputs(form: &Self::Form, _snapshots: &Snapshots) -> Vec<InstructionInput> {
        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            InstructionInput::text("Pool Name", "poolName", Some(form.pool_name.clone())),
            InstructionInput::switch("Allow Swap", "allow", form.allow),
        ]
    }

    fn build(
        form: &Self::Form,
        _snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction> {
        let client = ctx.client_for(governed)?;
        let pdas = &client.pdas;
        let pool = pdas.pool(&form.pool_name)?;

        let params = SetPoolAllowSwapParams {
            allow_swap: form.allow,
        };

        Ok(Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new_readonly(pdas.cortex, false),
                AccountMeta::new(pool, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
