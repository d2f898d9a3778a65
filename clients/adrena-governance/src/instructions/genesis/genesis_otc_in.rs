use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::{GENESIS_CUSTODY_INDEXES, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::forms::{is_present_number, short_address, InstructionInput, Schema};
use crate::instructions::{
    field_number, pool_input, AdrenaInstruction, BuildContext, BuilderErrorCode,
    BuiltInstruction, InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::{Custody, Keyed, Pool};
use crate::utils::{checked_integer, get_associated_token_address};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenesisOtcInParams {
    pub custody_one_amount: u64,
    pub custody_two_amount: u64,
    pub custody_three_amount: u64,
}

impl InstructionPayload for GenesisOtcInParams {
    const NAME: &'static str = "genesis_otc_in";
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenesisOtcInForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    /// Native units of the custody mint
    pub custody_one_amount: Option<f64>,
    pub custody_two_amount: Option<f64>,
    pub custody_three_amount: Option<f64>,
}

impl Default for GenesisOtcInForm {
    fn default() -> Self {
        Self {
            governed_account: None,
            pool: None,
            custody_one_amount: Some(0.0),
            custody_two_amount: Some(0.0),
            custody_three_amount: Some(0.0),
        }
    }
}

/// Custodies funded by the genesis OTC, loaded from the selected pool's slots
///
/// `None` until all three slots hold a loaded custody.
pub fn genesis_custodies(pool: &Keyed<Pool>, snapshots: &Snapshots) -> Option<[Keyed<Custody>; 3]> {
    let [one, two, three] =
        GENESIS_CUSTODY_INDEXES.map(|slot| snapshots.custody(Some(pool.account.custodies[slot])));
    Some([one?, two?, three?])
}

/// Deposits the DAO's genesis liquidity into custodies one to three
///
/// Tokens are pulled from the treasury's associated token accounts.
pub struct GenesisOtcIn;

impl InstructionBuilder for GenesisOtcIn {
    type Form = GenesisOtcInForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::GenesisOtcIn;

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
            .rule("custodyOneAmount", "Amount is required", |f| {
                is_present_number(&f.custody_one_amount)
            })
            .rule("custodyTwoAmount", "Amount is required", |f| {
                is_present_number(&f.custody_two_amount)
            })
            .rule("custodyThreeAmount", "Amount is required", |f| {
                is_present_number(&f.custody_three_amount)
            })
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        let mut inputs = vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
        ];

        let custodies = snapshots
            .pool(form.pool)
            .filter(|_| form.governed_account.is_some())
            .and_then(|pool| genesis_custodies(pool, snapshots));
        let Some(custodies) = custodies else {
            return inputs;
        };

        let amounts = [
            ("custodyOneAmount", form.custody_one_amount),
            ("custodyTwoAmount", form.custody_two_amount),
            ("custodyThreeAmount", form.custody_three_amount),
        ];
        for (custody, (name, amount)) in custodies.iter().zip(amounts) {
            inputs.push(InstructionInput::number(
                format!("{}.. Custody Native Amount", short_address(&custody.account.mint)),
                name,
                amount,
            ));
        }

        inputs
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
        require!(snapshots.custodies.is_some(), BuilderErrorCode::MissingAccountData);
        let [one, two, three] =
            genesis_custodies(pool, snapshots).ok_or(BuilderErrorCode::UnknownAccount)?;

        let params = GenesisOtcInParams {
            custody_one_amount: checked_integer(field_number(form.custody_one_amount)?)?,
            custody_two_amount: checked_integer(field_number(form.custody_two_amount)?)?,
            custody_three_amount: checked_integer(field_number(form.custody_three_amount)?)?,
        };

        let admin = governed.governance.native_treasury_address;
        let funding_account = |custody: &Keyed<Custody>| {
            get_associated_token_address(&admin, &custody.account.mint)
        };
        let token_account = |custody: &Keyed<Custody>| {
            pdas.custody_token_account(&pool.pubkey, &custody.account.mint)
        };

        Ok(Instruction {
            program_id: pdas.program_id,
            accounts: vec![
                AccountMeta::new_readonly(admin, true),
                AccountMeta::new(pdas.cortex, false),
                AccountMeta::new(pool.pubkey, false),
                AccountMeta::new(pdas.genesis_lock(&pool.pubkey), false),
                AccountMeta::new(payer, true),
                AccountMeta::new(funding_account(&one), false),
                AccountMeta::new(funding_account(&two), false),
                AccountMeta::new(funding_account(&three), false),
                AccountMeta::new(one.pubkey, false),
                AccountMeta::new(token_account(&one), false),
                AccountMeta::new(two.pubkey, false),
                AccountMeta::new(token_account(&two), false),
                AccountMeta::new(three.pubkey, false),
                AccountMeta::new(token_account(&three), false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
