use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::forms::{InstructionInput, Schema};
use crate::instructions::{
    custody_input, pool_input, AdrenaInstruction, BuildContext, BuiltInstruction,
    InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetCustodyAllowSwapParams {
    pub allow_swap: bool,
}

impl InstructionPayload for SetCustodyAllowSwapParams {
    const NAME: &'static str = "set_custody_allow_swap";
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetCustodyAllowSwapForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    pub custody: Option<Pubkey>,
    pub allow: bool,
}

/// Enables or disables swaps in and out of one custody
pub struct SetCustodyAllowSwap;

impl InstructionBuilder for SetCustodyAllowSwap {
    type Form = SetCustodyAllowSwapForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetCustodyAllowSwap;

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
            .rule("custody", "Custody is required", |f| f.custody.is_some())
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
            custody_input(snapshots, form.custody),
            InstructionInput::switch("Allow Swap", "allow", form.allow),
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
        let pool = snapshots.require_pool(form.pool)?;
        let custody = snapshots.require_custody(pool, form.custody)?;

        let params = SetCustodyAllowSwapParams {
            allow_swap: form.allow,
        };

        Ok(Instruction {
            program_id: client.program_id(),
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new_readonly(client.pdas.cortex, false),
                AccountMeta::new_readonly(pool.pubkey, false),
                AccountMeta::new(custody.pubkey, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
