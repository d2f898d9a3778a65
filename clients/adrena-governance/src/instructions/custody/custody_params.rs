use anchor_lang::prelude::*;

use crate::constants::{MAX_CUSTODIES, USD_DECIMALS};
use crate::forms::{is_present_number, InstructionInput};
use crate::instructions::{field_number, ratio_inputs};
use crate::state::{BorrowRateParams, Custody, Fees, Pool, PricingParams, TokenRatios};
use crate::utils::{checked_integer, native_to_ui_amount, ui_amount_to_native};

/// Min, target and max ratio entered for one custody slot, in basis points
pub type RatioInput = [Option<f64>; 3];

/// Risk and fee settings entered for a custody
///
/// Leverages are in 10000 = x1 units, USD amounts in whole dollars, fees in
/// basis points.
#[derive(Clone, Debug, PartialEq)]
pub struct CustodyParamsForm {
    pub is_stable: bool,
    pub max_initial_leverage: Option<f64>,
    pub max_leverage: Option<f64>,
    pub max_position_locked_usd: Option<f64>,
    pub max_cumulative_short_position_size_usd: Option<f64>,
    pub fee_swap_in: Option<f64>,
    pub fee_swap_out: Option<f64>,
    pub fee_stable_swap_in: Option<f64>,
    pub fee_stable_swap_out: Option<f64>,
    pub fee_add_liquidity: Option<f64>,
    pub fee_remove_liquidity: Option<f64>,
    pub fee_close_position: Option<f64>,
    pub fee_liquidation: Option<f64>,
    pub fee_max: Option<f64>,
    /// 0.008% = 80000
    pub max_hourly_borrow_interest_rate: Option<f64>,
    /// Pool ratios after the change, indexed by custody slot
    pub ratios: [RatioInput; MAX_CUSTODIES],
}

impl Default for CustodyParamsForm {
    fn default() -> Self {
        Self {
            is_stable: false,
            // x105
            max_initial_leverage: Some(1_050_000.0),
            // x110
            max_leverage: Some(1_100_000.0),
            max_position_locked_usd: Some(250_000.0),
            max_cumulative_short_position_size_usd: Some(1_000_000.0),
            fee_swap_in: Some(10.0),
            fee_swap_out: Some(10.0),
            fee_stable_swap_in: Some(10.0),
            fee_stable_swap_out: Some(10.0),
            fee_add_liquidity: Some(10.0),
            fee_remove_liquidity: Some(10.0),
            fee_close_position: Some(16.0),
            fee_liquidation: Some(16.0),
            fee_max: Some(200.0),
            max_hourly_borrow_interest_rate: Some(80_000.0),
            ratios: [[None; 3]; MAX_CUSTODIES],
        }
    }
}

impl CustodyParamsForm {
    /// Current on-chain settings of `custody`, with the ratios of `pool`
    pub fn from_custody(custody: &Custody, pool: &Pool) -> Self {
        let mut ratios = [[None; 3]; MAX_CUSTODIES];
        for (input, ratio) in ratios.iter_mut().zip(pool.ratios.iter()) {
            *input = [
                Some(f64::from(ratio.min)),
                Some(f64::from(ratio.target)),
                Some(f64::from(ratio.max)),
            ];
        }

        Self {
            is_stable: custody.is_stable,
            max_initial_leverage: Some(f64::from(custody.pricing.max_initial_leverage)),
            max_leverage: Some(f64::from(custody.pricing.max_leverage)),
            max_position_locked_usd: Some(native_to_ui_amount(
                custody.pricing.max_position_locked_usd,
                USD_DECIMALS,
            )),
            max_cumulative_short_position_size_usd: Some(native_to_ui_amount(
                custody.pricing.max_cumulative_short_position_size_usd,
                USD_DECIMALS,
            )),
            fee_swap_in: Some(f64::from(custody.fees.swap_in)),
            fee_swap_out: Some(f64::from(custody.fees.swap_out)),
            fee_stable_swap_in: Some(f64::from(custody.fees.stable_swap_in)),
            fee_stable_swap_out: Some(f64::from(custody.fees.stable_swap_out)),
            fee_add_liquidity: Some(f64::from(custody.fees.add_liquidity)),
            fee_remove_liquidity: Some(f64::from(custody.fees.remove_liquidity)),
            fee_close_position: Some(f64::from(custody.fees.close_position)),
            fee_liquidation: Some(f64::from(custody.fees.liquidation)),
            fee_max: Some(f64::from(custody.fees.fee_max)),
            max_hourly_borrow_interest_rate: Some(
                custody.borrow_rate.max_hourly_borrow_interest_rate as f64,
            ),
            ratios,
        }
    }

    pub fn has_pricing(&self) -> bool {
        [
            self.max_initial_leverage,
            self.max_leverage,
            self.max_position_locked_usd,
            self.max_cumulative_short_position_size_usd,
        ]
        .iter()
        .all(is_present_number)
    }

    pub fn has_fees(&self) -> bool {
        self.fee_values().iter().all(is_present_number)
    }

    pub fn pricing(&self) -> Result<PricingParams> {
        Ok(PricingParams {
            max_initial_leverage: checked_integer(field_number(self.max_initial_leverage)?)?,
            max_leverage: checked_integer(field_number(self.max_leverage)?)?,
            max_position_locked_usd: ui_amount_to_native(
                field_number(self.max_position_locked_usd)?,
                USD_DECIMALS,
            )?,
            max_cumulative_short_position_size_usd: ui_amount_to_native(
                field_number(self.max_cumulative_short_position_size_usd)?,
                USD_DECIMALS,
            )?,
        })
    }

    pub fn fees(&self) -> Result<Fees> {
        let bps = |value: Option<f64>| -> Result<u16> { checked_integer(field_number(value)?) };

        Ok(Fees {
            swap_in: bps(self.fee_swap_in)?,
            swap_out: bps(self.fee_swap_out)?,
            stable_swap_in: bps(self.fee_stable_swap_in)?,
            stable_swap_out: bps(self.fee_stable_swap_out)?,
            add_liquidity: bps(self.fee_add_liquidity)?,
            remove_liquidity: bps(self.fee_remove_liquidity)?,
            close_position: bps(self.fee_close_position)?,
            liquidation: bps(self.fee_liquidation)?,
            fee_max: bps(self.fee_max)?,
            padding: [0; 2],
            padding2: 0,
        })
    }

    pub fn borrow_rate(&self) -> Result<BorrowRateParams> {
        Ok(BorrowRateParams {
            max_hourly_borrow_interest_rate: checked_integer(field_number(
                self.max_hourly_borrow_interest_rate,
            )?)?,
        })
    }

    /// Ratios of every slot, slots left empty in the form are zero
    pub fn ratios(&self) -> Result<[TokenRatios; MAX_CUSTODIES]> {
        let bps = |value: Option<f64>| -> Result<u16> {
            value.map_or(Ok(0), checked_integer::<u16>)
        };

        let mut ratios = [TokenRatios::default(); MAX_CUSTODIES];
        for (ratio, [min, target, max]) in ratios.iter_mut().zip(self.ratios.iter()) {
            *ratio = TokenRatios {
                target: bps(*target)?,
                min: bps(*min)?,
                max: bps(*max)?,
                padding: [0; 2],
            };
        }
        Ok(ratios)
    }

    /// Stability, pricing, fee and borrow rate inputs
    pub fn inputs(&self, oracle: Option<String>, trade_oracle: Option<String>) -> Vec<InstructionInput> {
        vec![
            InstructionInput::text("Custody Oracle", "custodyOracle", oracle),
            InstructionInput::text("Custody Trade Oracle", "custodyTradeOracle", trade_oracle),
            InstructionInput::switch("Is Stable", "isStable", self.is_stable),
            InstructionInput::number(
                "Max Initial Leverage (10000 = x1)",
                "maxInitialLeverage",
                self.max_initial_leverage,
            ),
            InstructionInput::number("Max Leverage (10000 = x1)", "maxLeverage", self.max_leverage),
            InstructionInput::number(
                "Max Position Locked Usd",
                "maxPositionLockedUsd",
                self.max_position_locked_usd,
            ),
            InstructionInput::number(
                "Max Cumulative Short Position Size Usd",
                "maxCumulativeShortPositionSizeUsd",
                self.max_cumulative_short_position_size_usd,
            ),
            InstructionInput::number("Fee Swap IN (in BPS)", "feeSwapIn", self.fee_swap_in),
            InstructionInput::number("Fee Swap OUT (in BPS)", "feeSwapOut", self.fee_swap_out),
            InstructionInput::number(
                "Fee Stable Swap IN (in BPS)",
                "feeStableSwapIn",
                self.fee_stable_swap_in,
            ),
            InstructionInput::number(
                "Fee Stable Swap OUT (in BPS)",
                "feeStableSwapOut",
                self.fee_stable_swap_out,
            ),
            InstructionInput::number(
                "Fee Add Liquidity (in BPS)",
                "feeAddLiquidity",
                self.fee_add_liquidity,
            ),
            InstructionInput::number(
                "Fee Remove Liquidity (in BPS)",
                "feeRemoveLiquidity",
                self.fee_remove_liquidity,
            ),
            InstructionInput::number(
                "Fee Close Position (in BPS)",
                "feeClosePosition",
                self.fee_close_position,
            ),
            InstructionInput::number(
                "Fee Liquidation (in BPS)",
                "feeLiquidation",
                self.fee_liquidation,
            ),
            InstructionInput::number("Fee Max (in BPS)", "feeMax", self.fee_max),
            InstructionInput::number(
                "Max Hourly Borrow Interest Rate (0.008% = 80000)",
                "maxHourlyBorrowInterestRate",
                self.max_hourly_borrow_interest_rate,
            ),
        ]
    }

    /// Ratio inputs of slots `0..count`, labelled by `suffix`
    pub fn ratio_inputs(&self, count: usize, suffix: impl Fn(usize) -> String) -> Vec<InstructionInput> {
        self.ratios
            .iter()
            .take(count)
            .enumerate()
            .flat_map(|(slot, values)| ratio_inputs(slot, &suffix(slot), *values))
            .collect()
    }

    fn fee_values(&self) -> [Option<f64>; 10] {
        [
            self.fee_swap_in,
            self.fee_swap_out,
            self.fee_stable_swap_in,
            self.fee_stable_swap_out,
            self.fee_add_liquidity,
            self.fee_remove_liquidity,
            self.fee_close_position,
            self.fee_liquidation,
            self.fee_max,
            self.max_hourly_borrow_interest_rate,
        ]
    }
}
