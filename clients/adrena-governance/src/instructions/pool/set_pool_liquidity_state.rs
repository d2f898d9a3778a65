use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::forms::{InstructionInput, Schema};
use crate::instructions::{
    pool_input, AdrenaInstruction, BuildContext, BuiltInstruction, InstructionBuilder,
    InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::LiquidityState;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetPoolLiquidityStateParams {
    pub liquidity_state: LiquidityState,
}

impl InstructionPayload for SetPoolLiquidityStateParams {
    const NAME: &'static str = "set_pool_liquidity_state";
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetPoolLiquidityStateForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    pub liquidity_state: LiquidityState,
}

/// Moves a pool between genesis, idle and active liquidity
pub struct SetPoolLiquidityState;

impl InstructionBuilder for SetPoolLiquidityState {
    type Form = SetPoolLiquidityStateForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetPoolLiquidityState;

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
        let options = LiquidityState::ALL
            .iter()
            .map(|state| state.label().to_string())
            .collect();

        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
            InstructionInput::select(
                "Liquidity State",
                "liquidityState",
                options,
                Some(form.liquidity_state.label().to_string()),
            ),
        ]
    }

    fn has_account_data(_form: &Self::Form, snapshots: &Snapshots) -> bool {
        snapshots.pools.is_some()
    }

    fn build(
        form: &Self::Form,
        snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction> {
        let client = ctx.client_for(governed)?;
        let pool = snapshots.require_pool(form.pool)?;

        let params = SetPoolLiquidityStateParams {
            liquidity_state: form.liquidity_state,
        };

        Ok(Instruction {
            program_id: client.program_id(),
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new_readonly(client.pdas.cortex, false),
                AccountMeta::new(pool.pubkey, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
