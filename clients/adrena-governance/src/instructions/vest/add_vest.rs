use anchor_lang::prelude::*;
use ::log::warn;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::{RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID, VOTE_MULTIPLIER_SCALE};
use crate::forms::{is_present_number, is_present_text, is_valid_pubkey, InstructionInput, Schema};
use crate::instructions::{
    field_number, field_pubkey, AdrenaInstruction, BuildContext, BuilderErrorCode,
    BuiltInstruction, InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::OriginBucket;
use crate::utils::{checked_integer, scale_ratio_floor, ui_amount_to_native};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddVestParams {
    pub amount: u64,
    pub origin_bucket: OriginBucket,
    pub unlock_start_timestamp: i64,
    pub unlock_end_timestamp: i64,
    /// 10000 = x1
    pub vote_multiplier: u32,
}

impl InstructionPayload for AddVestParams {
    const NAME: &'static str = "add_vest";
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddVestForm {
    pub governed_account: Option<GovernedAccount>,
    /// Beneficiary wallet
    pub owner: Option<String>,
    /// LM tokens, in whole tokens
    pub amount: Option<f64>,
    pub origin_bucket: OriginBucket,
    pub unlock_start_timestamp: Option<f64>,
    pub unlock_end_timestamp: Option<f64>,
    /// 1.0 = x1
    pub vote_multiplier: Option<f64>,
}

impl Default for AddVestForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            owner: None,
            amount: Some(0.0),
            origin_bucket: OriginBucket::Ecosystem,
            unlock_start_timestamp: Some(0.0),
            unlock_end_timestamp: Some(0.0),
            vote_multiplier: Some(0.0),
        }
    }
}

/// Creates a vest releasing LM tokens from an origin bucket to a beneficiary
///
/// The vest registers the beneficiary in the DAO realm, so the cortex is
/// fetched at build time for the realm and the LM token decimals.
pub struct AddVest;

impl InstructionBuilder for AddVest {
    type Form = AddVestForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::AddVest;

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
            .rule("owner", "Owner is required", |f| is_present_text(&f.owner))
            .rule("owner", "Owner must be a valid address", |f| is_valid_pubkey(&f.owner))
            .rule("amount", "Token amount is required", |f| is_present_number(&f.amount))
            .rule(
                "unlockStartTimestamp",
                "Unlock start timestamp is required",
                |f| is_present_number(&f.unlock_start_timestamp),
            )
            .rule(
                "unlockEndTimestamp",
                "Unlock end timestamp is required",
                |f| is_present_number(&f.unlock_end_timestamp),
            )
            .rule(
                "unlockEndTimestamp",
                "Unlock end timestamp must not precede the start",
                |f| match (f.unlock_start_timestamp, f.unlock_end_timestamp) {
                    (Some(start), Some(end)) => end >= start,
                    _ => true,
                },
            )
            .rule("voteMultiplier", "Vote multiplier is required", |f| {
                is_present_number(&f.vote_multiplier)
            })
    }

    fn inputs(form: &Self::Form, _snapshots: &Snapshots) -> Vec<InstructionInput> {
        let buckets = OriginBucket::ALL
            .iter()
            .map(|bucket| bucket.label().to_string())
            .collect();

        vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            InstructionInput::text("Owner", "owner", form.owner.clone()),
            InstructionInput::select(
                "Origin Bucket",
                "originBucket",
                buckets,
                Some(form.origin_bucket.label().to_string()),
            ),
            InstructionInput::number("Token Amount", "amount", form.amount),
            InstructionInput::number(
                "Unlock Start Timestamp",
                "unlockStartTimestamp",
                form.unlock_start_timestamp,
            ),
            InstructionInput::number(
                "Unlock End Timestamp",
                "unlockEndTimestamp",
                form.unlock_end_timestamp,
            ),
            InstructionInput::number("Vote Multiplier", "voteMultiplier", form.vote_multiplier),
        ]
    }

    fn build(
        form: &Self::Form,
        _snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction> {
        let client = ctx.client_for(governed)?;
        let payer = ctx.payer()?;
        let pdas = &client.pdas;
        let owner = field_pubkey(&form.owner)?;

        let cortex = client.get_cortex().map_err(|err| {
            warn!("Cannot load cortex for add_vest: {}", err);
            error!(BuilderErrorCode::MissingAccountData)
        })?;
        let realm = cortex.governance_realm;

        let params = AddVestParams {
            amount: ui_amount_to_native(field_number(form.amount)?, cortex.lm_token_decimals)?,
            origin_bucket: form.origin_bucket,
            unlock_start_timestamp: checked_integer(field_number(form.unlock_start_timestamp)?)?,
            unlock_end_timestamp: checked_integer(field_number(form.unlock_end_timestamp)?)?,
            vote_multiplier: scale_ratio_floor(
                field_number(form.vote_multiplier)?,
                VOTE_MULTIPLIER_SCALE,
            )?,
        };

        Ok(Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new(pdas.cortex, false),
                AccountMeta::new_readonly(owner, false),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(pdas.transfer_authority, false),
                AccountMeta::new(pdas.vest_registry, false),
                AccountMeta::new(pdas.vest(&owner), false),
                AccountMeta::new(pdas.lm_token_mint, false),
                AccountMeta::new(pdas.governance_token_mint, false),
                AccountMeta::new_readonly(realm, false),
                AccountMeta::new_readonly(pdas.governance_realm_config(&realm), false),
                AccountMeta::new(pdas.governing_token_holding(&realm), false),
                AccountMeta::new(pdas.governing_token_owner_record(&realm, &owner), false),
                AccountMeta::new_readonly(pdas.governance_program_id, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
