use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::MAX_BASIS_POINTS;
use crate::forms::{is_present_number, InstructionInput, Schema};
use crate::instructions::{
    field_number, AdrenaInstruction, BuildContext, BuilderErrorCode, BuiltInstruction,
    InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::utils::checked_integer;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetStakingLmEmissionPotentiometersParams {
    pub lm_emission_potentiometer_bps: u16,
}

impl InstructionPayload for SetStakingLmEmissionPotentiometersParams {
    const NAME: &'static str = "set_staking_lm_emission_potentiometers";
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetStakingLmEmissionPotentiometersForm {
    pub governed_account: Option<GovernedAccount>,
    pub staking: Option<Pubkey>,
    pub lm_emission_potentiometer_bps: Option<f64>,
}

impl Default for SetStakingLmEmissionPotentiometersForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            staking: None,
            lm_emission_potentiometer_bps: Some(0.0),
        }
    }
}

/// Scales the LM emissions of a staking pool, in basis points of the schedule
pub struct SetStakingLmEmissionPotentiometers;

impl InstructionBuilder for SetStakingLmEmissionPotentiometers {
    type Form = SetStakingLmEmissionPotentiometersForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetStakingLmEmissionPotentiometers;

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
            .rule(
                "lmEmissionPotentiometerBps",
                "LM emission potentiometer BPS is required",
                |f| is_present_number(&f.lm_emission_potentiometer_bps),
            )
            .rule(
                "lmEmissionPotentiometerBps",
                "LM emission potentiometer BPS must be between 0 and 10000",
                |f| {
                    f.lm_emission_potentiometer_bps
                        .is_some_and(|bps| (0.0..=f64::from(MAX_BASIS_POINTS)).contains(&bps))
                },
            )
            .rule("staking", "Staking is required", |f| f.staking.is_some())
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        let options = snapshots
            .stakings
            .iter()
            .flatten()
            .map(|staking| staking.pubkey.to_string())
            .collect();
        let selected = snapshots
            .staking(form.staking)
            .map(|staking| staking.pubkey.to_string());

        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            InstructionInput::number(
                "LM Emission Potentiometer BPS",
                "lmEmissionPotentiometerBps",
                form.lm_emission_potentiometer_bps,
            ),
            InstructionInput::select("Staking", "staking", options, selected),
        ]
    }

    fn has_account_data(_form: &Self::Form, snapshots: &Snapshots) -> bool {
        snapshots.stakings.is_some()
    }

    fn build(
        form: &Self::Form,
        snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction> {
        let client = ctx.client_for(governed)?;
        require!(snapshots.stakings.is_some(), BuilderErrorCode::MissingAccountData);
        let staking = snapshots
            .staking(form.staking)
            .ok_or(BuilderErrorCode::UnknownAccount)?;

        let params = SetStakingLmEmissionPotentiometersParams {
            lm_emission_potentiometer_bps: checked_integer(field_number(
                form.lm_emission_potentiometer_bps,
            )?)?,
        };

        Ok(Instruction {
            program_id: client.program_id(),
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new_readonly(client.pdas.cortex, false),
                AccountMeta::new(staking.pubkey, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
