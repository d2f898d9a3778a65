use anchor_lang::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::constants::MAX_CUSTODIES;
use crate::forms::{is_valid_pubkey, short_address, InstructionInput, Schema};
use crate::instructions::{
    custody_input, field_pubkey, pool_input, AdrenaInstruction, BuildContext, BuiltInstruction,
    CustodyParamsForm, InstructionBuilder, InstructionPayload, Snapshots,
};
use crate::proposal::GovernedAccount;
use crate::state::{BorrowRateParams, Custody, Fees, Pool, PricingParams, TokenRatios};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetCustodyConfigParams {
    pub is_stable: bool,
    pub oracle: Pubkey,
    pub trade_oracle: Pubkey,
    pub pricing: PricingParams,
    pub fees: Fees,
    pub borrow_rate: BorrowRateParams,
    pub ratios: [TokenRatios; MAX_CUSTODIES],
}

impl InstructionPayload for SetCustodyConfigParams {
    const NAME: &'static str = "set_custody_config";
}

/// Settings left as `None` keep the custody's current on-chain value, both in
/// the presented inputs and in the submitted instruction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetCustodyConfigForm {
    pub governed_account: Option<GovernedAccount>,
    pub pool: Option<Pubkey>,
    pub custody: Option<Pubkey>,
    pub custody_oracle: Option<String>,
    pub custody_trade_oracle: Option<String>,
    pub params: Option<CustodyParamsForm>,
}

/// Values a set custody config form stands for once unset fields take the
/// custody's current configuration
struct ResolvedConfig {
    oracle: Option<String>,
    trade_oracle: Option<String>,
    params: CustodyParamsForm,
}

impl SetCustodyConfigForm {
    /// Form holding the current configuration of the selected custody
    ///
    /// Returns the form unchanged while pool or custody are not loaded.
    pub fn prefilled(mut self, snapshots: &Snapshots) -> Self {
        let (Some(pool), Some(custody)) = (snapshots.pool(self.pool), snapshots.custody(self.custody))
        else {
            return self;
        };

        let resolved = self.resolve(&pool.account, &custody.account);
        self.custody_oracle = resolved.oracle;
        self.custody_trade_oracle = resolved.trade_oracle;
        self.params = Some(resolved.params);
        self
    }

    fn resolve(&self, pool: &Pool, custody: &Custody) -> ResolvedConfig {
        ResolvedConfig {
            oracle: self
                .custody_oracle
                .clone()
                .or_else(|| Some(custody.oracle.to_string())),
            trade_oracle: self
                .custody_trade_oracle
                .clone()
                .or_else(|| Some(custody.trade_oracle.to_string())),
            params: self
                .params
                .clone()
                .unwrap_or_else(|| CustodyParamsForm::from_custody(custody, pool)),
        }
    }
}

/// Replaces the oracles, risk limits, fees and pool ratios of a custody
pub struct SetCustodyConfig;

impl InstructionBuilder for SetCustodyConfig {
    type Form = SetCustodyConfigForm;

    const INSTRUCTION: AdrenaInstruction = AdrenaInstruction::SetCustodyConfig;

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
            .rule("custodyOracle", "Custody oracle must be a valid address", |f| {
                f.custody_oracle.is_none() || is_valid_pubkey(&f.custody_oracle)
            })
            .rule(
                "custodyTradeOracle",
                "Custody trade oracle must be a valid address",
                |f| f.custody_trade_oracle.is_none() || is_valid_pubkey(&f.custody_trade_oracle),
            )
            .rule("pricing", "Pricing parameters are required", |f| {
                f.params.as_ref().map_or(true, CustodyParamsForm::has_pricing)
            })
            .rule("fees", "Fee parameters are required", |f| {
                f.params.as_ref().map_or(true, CustodyParamsForm::has_fees)
            })
    }

    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput> {
        let mut inputs = vec![
            InstructionInput::governed_account(form.governed_account.map(|g| g.pubkey)),
            pool_input(snapshots, form.pool),
            custody_input(snapshots, form.custody),
        ];

        let (Some(pool), Some(custody)) = (snapshots.pool(form.pool), snapshots.custody(form.custody))
        else {
            return inputs;
        };

        let ResolvedConfig {
            oracle,
            trade_oracle,
            params,
        } = form.resolve(&pool.account, &custody.account);
        inputs.extend(params.inputs(oracle, trade_oracle));

        let registered = pool
            .account
            .first_empty_custody_slot()
            .unwrap_or(MAX_CUSTODIES);
        inputs.extend(params.ratio_inputs(registered, |slot| {
            let address = pool.account.custodies[slot];
            if address == custody.pubkey {
                "*UPDATE".to_string()
            } else {
                short_address(&address)
            }
        }));

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
        let pool = snapshots.require_pool(form.pool)?;
        let custody = snapshots.require_custody(pool, form.custody)?;
        let resolved = form.resolve(&pool.account, &custody.account);

        let params = SetCustodyConfigParams {
            is_stable: resolved.params.is_stable,
            oracle: field_pubkey(&resolved.oracle)?,
            trade_oracle: field_pubkey(&resolved.trade_oracle)?,
            pricing: resolved.params.pricing()?,
            fees: resolved.params.fees()?,
            borrow_rate: resolved.params.borrow_rate()?,
            ratios: resolved.params.ratios()?,
        };

        Ok(Instruction {
            program_id: client.program_id(),
            accounts: vec![
                AccountMeta::new_readonly(governed.governance.native_treasury_address, true),
                AccountMeta::new_readonly(client.pdas.cortex, false),
                AccountMeta::new(custody.pubkey, false),
                AccountMeta::new(pool.pubkey, false),
            ],
            data: params.data(),
        }
        .into())
    }
}
