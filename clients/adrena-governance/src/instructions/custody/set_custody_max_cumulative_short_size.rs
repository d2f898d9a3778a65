use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::USD_DECIMALS;
use crate::forms::{is_present_number, InstructionInput, Schema};
use crate::instructions::{
    custody_input, field_number, pool_input, AdrenaInstruction, BuildContext, BuiltInstruction,
    InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::utils::ui_amount_to_native;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetCustodyMaxCumulativeShortPositionSizeUsdParams {
    /// USD with 6 decimals
    pub max_cumulative_short_position_size_usd: u64,
}

impl InstructionPayload for SetCustodyMaxCumulativeShortPositionSizeUsdParams {
    const NAME: &'static str = "set_custody_max_cumulative_short_position_size_usd";
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetCustodyMaxCumulativeShortSizeUsdForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    pub custody: Option<Pubkey>,
    /// Whole USD
    pub max_cumulative_short_size_usd: Option<f64>,
}

impl Default for SetCustodyMaxCumulativeShortSizeUsdForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            pool: None,
            custody: None,
            max_cumulative_short_size_usd: Some(0.0),
        }
    }
}

/// Caps the total size of short positions opened against a custody
pub struct SetCustodyMaxCumulativeShortSizeUsd;

impl InstructionBuilder for SetCustodyMaxCumulativeShortSizeUsd {
    type Form = SetCustodyMaxCumulativeShortSizeUsdForm;

    const INSTRUCTION: AdrenaInstruction =
        AdrenaInstruction::SetCustodyMaxCumulativeShortPositionSizeUsd;

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
            .rule(
                "maxCumulativeShortSizeUsd",
                "Max Cumulative Short Size Usd is required",
                |f| is_present_number(&f.max_cumulative_short_size_usd),
            )
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
            custody_input(snapshots, form.custody),
            InstructionInput::number(
                "Max Cumulative Short Size Usd",
                "maxCumulativeShortSizeUsd",
                form.max_cumulative_short_size_usd,
            ),
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

        let params = SetCustodyMaxCumulativeShortPositionSizeUsdParams {
            max_cumulative_short_position_size_usd: ui_amount_to_native(
                field_number(form.max_cumulative_short_size_usd)?,
                USD_DECIMALS,
            )?,
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
