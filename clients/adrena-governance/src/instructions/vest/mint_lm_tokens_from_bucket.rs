use anchor_lang::prelude::*;
use ::log::{debug, warn};
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::TOKEN_PROGRAM_ID;
use crate::forms::{is_present_number, is_present_text, is_valid_pubkey, InstructionInput, Schema};
use crate::instructions::{
    field_number, field_pubkey, AdrenaInstruction, BuildContext, BuilderErrorCode,
    BuiltInstruction, InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::OriginBucket;
use crate::utils::{create_associated_token_account_idempotent, ui_amount_to_native};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintLmTokensFromBucketParams {
    pub bucket_name: OriginBucket,
    pub amount: u64,
    /// Free text recorded with the mint
    pub reason: String,
}

impl InstructionPayload for MintLmTokensFromBucketParams {
    const NAME: &'static str = "mint_lm_tokens_from_bucket";
}

#[derive(Clone, Debug, PartialEq)]
pub struct MintLmTokensFromBucketForm {
    pub governed_account: Option<GovernedAccount>,
    /// Wallet receiving the tokens
    pub owner: Option<String>,
    pub origin_bucket: OriginBucket,
    /// LM tokens, in whole tokens
    pub amount: Option<f64>,
    pub reason: Option<String>,
}

impl Default for MintLmTokensFromBucketForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            owner: None,
            origin_bucket: OriginBucket::Ecosystem,
            amount: Some(0.0),
            reason: None,
        }
    }
}

/// Mints LM tokens out of an origin bucket allocation into a wallet
///
/// Amounts are scaled with the LM token decimals recorded in the cortex.
/// When the wallet has no LM token account yet, an idempotent creation of the
/// associated account is returned as prerequisite.
pub struct MintLmTokensFromBucket;

impl InstructionBuilder for MintLmTokensFromBucket {
    type Form = MintLmTokensFromBucketForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::MintLmTokensFromBucket;

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
            .rule("reason", "Reason is required", |f| is_present_text(&f.reason))
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
            InstructionInput::text("Reason", "reason", form.reason.clone()),
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
        let receiving_account = pdas.lm_token_account(&owner);

        let cortex = client.get_cortex().map_err(|err| {
            warn!("Cannot load cortex for mint_lm_tokens_from_bucket: {}", err);
            error!(BuilderErrorCode::MissingAccountData)
        })?;

        let params = MintLmTokensFromBucketParams {
            bucket_name: form.origin_bucket,
            amount: ui_amount_to_native(field_number(form.amount)?, cortex.lm_token_decimals)?,
            reason: form.reason.clone().unwrap_or_default(),
        };

        let receiving_account_exists = client.account_exists(&receiving_account).map_err(|err| {
            warn!("Cannot check LM token account {}: {}", receiving_account, err);
            error!(BuilderErrorCode::MissingAccountData)
        })?;

        let mut prerequisites = Vec::new();
        if !receiving_account_exists {
            debug!("LM token account {} will be created first", receiving_account);
            prerequisites.push(create_associated_token_account_idempotent(
                &payer,
                &owner,
                &pdas.lm_token_mint,
            ));
        }

        let instruction = Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new(receiving_account, false),
                AccountMeta::new_readonly(pdas.transfer_authority, false),
                AccountMeta::new(pdas.cortex, false),
                AccountMeta::new(pdas.lm_token_mint, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: params.data(),
        };

        Ok(BuiltInstruction {
            instruction,
            prerequisites,
        })
    }
}
