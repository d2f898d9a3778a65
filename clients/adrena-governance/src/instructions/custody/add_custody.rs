use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::{MAX_CUSTODIES, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::forms::{is_valid_pubkey, InstructionInput, Schema};
use crate::instructions::{
    custody_slot_label, field_pubkey, pool_input, AdrenaInstruction, BuildContext,
    BuiltInstruction, CustodyParamsForm, InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::{BorrowRateParams, Fees, PricingParams, TokenRatios};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddCustodyParams {
    pub is_stable: bool,
    pub pricing: PricingParams,
    pub allow_swap: bool,
    pub allow_trade: bool,
    pub fees: Fees,
    pub borrow_rate: BorrowRateParams,
    pub ratios: [TokenRatios; MAX_CUSTODIES],
}

impl InstructionPayload for AddCustodyParams {
    const NAME: &'static str = "add_custody";
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddCustodyForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    pub mint: Option<String>,
    pub custody_oracle: Option<String>,
    pub custody_trade_oracle: Option<String>,
    pub params: CustodyParamsForm,
}

/// Registers a new collateral mint in a pool
///
/// The custody lands in the pool's first empty slot. Swaps and trading start
/// disabled and are opened by later proposals.
pub struct AddCustody;

impl InstructionBuilder for AddCustody {
    type Form = AddCustodyForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::AddCustody;

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
            .rule("mint", "Mint must be a valid address", |f| is_valid_pubkey(&f.mint))
            .rule("custodyOracle", "Custody oracle must be a valid address", |f| {
                is_valid_pubkey(&f.custody_oracle)
            })
            .rule(
                "custodyTradeOracle",
                "Custody trade oracle must be a valid address",
                |f| is_valid_pubkey(&f.custody_trade_oracle),
            )
            .rule("pricing", "Pricing parameters are required", |f| {
                f.params.has_pricing()
            })
            .rule("fees", "Fee parameters are required", |f| f.params.has_fees())
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        let mut inputs = vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
        ];

        let Some(pool) = snapshots.pool(form.pool) else {
            return inputs;
        };

        inputs.push(InstructionInput::text("Mint", "mint", form.mint.clone()));
        inputs.extend(
            form.params
                .inputs(form.custody_oracle.clone(), form.custody_trade_oracle.clone()),
        );

        // A full pool has no slot left and shows no ratio inputs
        if let Some(new_slot) = pool.account.first_empty_custody_slot() {
            inputs.extend(form.params.ratio_inputs(new_slot + 1, |slot| {
                if slot == new_slot {
                    "*NEW CUSTODY".to_string()
                } else {
                    custody_slot_label(&pool.account.custodies[slot])
                }
            }));
        }

        inputs
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
        let payer = ctx.payer()?;
        let pool = snapshots.require_pool(form.pool)?;
        let pdas = &client.pdas;

        let mint = field_pubkey(&form.mint)?;
        let custody_oracle = field_pubkey(&form.custody_oracle)?;
        let custody_trade_oracle = field_pubkey(&form.custody_trade_oracle)?;

        let params = AddCustodyParams {
            is_stable: form.params.is_stable,
            pricing: form.params.pricing()?,
            allow_swap: false,
            allow_trade: false,
            fees: form.params.fees()?,
            borrow_rate: form.params.borrow_rate()?,
            ratios: form.params.ratios()?,
        };

        Ok(Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new(pdas.cortex, false),
                AccountMeta::new(pdas.custody(&pool.pubkey, &mint), false),
                AccountMeta::new(pool.pubkey, false),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(pdas.transfer_authority, false),
                AccountMeta::new(pdas.custody_token_account(&pool.pubkey, &mint), false),
                AccountMeta::new_readonly(custody_oracle, false),
                AccountMeta::new_readonly(custody_trade_oracle, false),
                AccountMeta::new_readonly(mint, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
