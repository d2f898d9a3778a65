use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::USD_DECIMALS;
use crate::forms::{is_present_number, InstructionInput, Schema};
use crate::instructions::{
    field_number, pool_input, AdrenaInstruction, BuildContext, BuiltInstruction,
    InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::utils::ui_amount_to_native;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetPoolAumSoftCapUsdParams {
    /// USD with 6 decimals
    pub aum_soft_cap_usd: u64,
}

impl InstructionPayload for SetPoolAumSoftCapUsdParams {
    const NAME: &'static str = "set_pool_aum_soft_cap_usd";
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetPoolAumSoftCapUsdForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    /// Whole USD
    pub aum_soft_cap_usd: Option<f64>,
}

impl Default for SetPoolAumSoftCapUsdForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            pool: None,
            aum_soft_cap_usd: Some(0.0),
        }
    }
}

/// Caps the assets under management a pool accepts through liquidity adds
pub struct SetPoolAumSoftCapUsd;

impl InstructionBuilder for SetPoolAumSoftCapUsd {
    type Form = SetPoolAumSoftCapUsdForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetPoolAumSoftCapUsd;

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
            .rule("aumSoftCapUsd", "Aum soft cap usd is required", |f| {
                is_present_number(&f.aum_soft_cap_usd)
            })
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
            InstructionInput::number("Aum Soft Cap Usd", "aumSoftCapUsd", form.aum_soft_cap_usd),
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

        let params = SetPoolAumSoftCapUsdParams {
            aum_soft_cap_usd: ui_amount_to_native(field_number(form.aum_soft_cap_usd)?, USD_DECIMALS)?,
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
