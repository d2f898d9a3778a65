pub mod custody;
pub mod genesis;
pub mod pool;
pub mod staking;
pub mod vest;

pub use custody::*;
pub use genesis::*;
pub use pool::*;
pub use staking::*;
pub use vest::*;

use anchor_lang::prelude::*;
use ::log::debug;
use solana_sdk::instruction::Instruction;

use crate::client::AdrenaClient;
use crate::forms::{parse_pubkey, short_address, InstructionInput, Schema};
use crate::mirror::AdrenaMirror;
use crate::proposal::{Governance, GovernedAccount, InstructionProvider, UiInstruction};
use crate::state::{anchor_discriminator, Custody, CustodySlot, Keyed, Pool, Staking};

/// Returns the Anchor instruction discriminator `sha256("global:<name>")[..8]`
pub fn ix_discriminator(name: &str) -> [u8; 8] {
    anchor_discriminator("global", name)
}

/// Argument struct of an Adrena instruction
pub trait InstructionPayload: AnchorSerialize {
    /// Snake case instruction name, e.g. `"set_pool_allow_swap"`
    const NAME: &'static str;

    fn data(&self) -> Vec<u8> {
        let mut data = ix_discriminator(Self::NAME).to_vec();
        // Writing into a Vec cannot fail
        let _ = self.serialize(&mut data);
        data
    }
}

/// Error codes for instruction construction
#[error_code]
pub enum BuilderErrorCode {
    #[msg("No Adrena client is available")]
    MissingClient,
    #[msg("No payer wallet is connected")]
    MissingPayer,
    #[msg("Required account data has not been loaded")]
    MissingAccountData,
    #[msg("Selected account was not found in the loaded data")]
    UnknownAccount,
    #[msg("Client program does not match the governed program")]
    ProgramMismatch,
    #[msg("Form field is missing or malformed")]
    InvalidField,
}

/// Runtime inputs of instruction construction besides the form
#[derive(Clone, Copy, Default)]
pub struct BuildContext<'a> {
    pub client: Option<&'a AdrenaClient>,
    /// Connected wallet, funds account creations
    pub payer: Option<Pubkey>,
}

impl<'a> BuildContext<'a> {
    pub fn new(client: Option<&'a AdrenaClient>, payer: Option<Pubkey>) -> Self {
        Self { client, payer }
    }

    /// Client of the governed program
    ///
    /// # Errors
    /// * `BuilderErrorCode::MissingClient` - If there is no client
    /// * `BuilderErrorCode::ProgramMismatch` - If the client targets another program
    pub fn client_for(&self, governed: &GovernedAccount) -> Result<&'a AdrenaClient> {
        let client = self.client.ok_or(BuilderErrorCode::MissingClient)?;
        require_keys_eq!(
            client.program_id(),
            governed.pubkey,
            BuilderErrorCode::ProgramMismatch
        );
        Ok(client)
    }

    pub fn payer(&self) -> Result<Pubkey> {
        Ok(self.payer.ok_or(BuilderErrorCode::MissingPayer)?)
    }
}

/// Account data the forms depend on, `None` while not loaded
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshots {
    pub pools: Option<Vec<Keyed<Pool>>>,
    /// Custodies of the selected pool
    pub custodies: Option<Vec<CustodySlot>>,
    pub stakings: Option<Vec<Keyed<Staking>>>,
}

impl Snapshots {
    pub fn from_mirror(mirror: &AdrenaMirror) -> Self {
        Self {
            pools: mirror.pools.get().cloned(),
            custodies: mirror.custodies.get().cloned(),
            stakings: mirror.stakings.get().cloned(),
        }
    }

    pub fn pool(&self, address: Option<Pubkey>) -> Option<&Keyed<Pool>> {
        let address = address?;
        self.pools
            .as_ref()?
            .iter()
            .find(|pool| pool.pubkey == address)
    }

    pub fn pool_by_name(&self, name: &str) -> Option<&Keyed<Pool>> {
        self.pools
            .as_ref()?
            .iter()
            .find(|pool| pool.account.display_name() == name)
    }

    /// Loaded custody at `address`, skipping empty and missing slots
    pub fn custody(&self, address: Option<Pubkey>) -> Option<Keyed<Custody>> {
        let address = address?;
        self.custodies
            .as_ref()?
            .iter()
            .find(|slot| slot.pubkey == address && !slot.is_empty())
            .and_then(CustodySlot::keyed)
    }

    pub fn staking(&self, address: Option<Pubkey>) -> Option<&Keyed<Staking>> {
        let address = address?;
        self.stakings
            .as_ref()?
            .iter()
            .find(|staking| staking.pubkey == address)
    }

    pub(crate) fn require_pool(&self, address: Option<Pubkey>) -> Result<&Keyed<Pool>> {
        require!(self.pools.is_some(), BuilderErrorCode::MissingAccountData);
        Ok(self.pool(address).ok_or(BuilderErrorCode::UnknownAccount)?)
    }

    /// Loaded custody at `address`, which must be one of `pool`'s slots
    pub(crate) fn require_custody(
        &self,
        pool: &Keyed<Pool>,
        address: Option<Pubkey>,
    ) -> Result<Keyed<Custody>> {
        require!(self.custodies.is_some(), BuilderErrorCode::MissingAccountData);
        let custody = self.custody(address).ok_or(BuilderErrorCode::UnknownAccount)?;
        require!(
            pool.account.custodies.contains(&custody.pubkey),
            BuilderErrorCode::UnknownAccount
        );
        Ok(custody)
    }
}

/// Lifecycle of an instruction form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// No governed program selected, so there is no program id to target
    Unconfigured,
    /// Program selected, dependent account data still loading
    AwaitingAccountData,
    Ready,
    Submitted,
    /// Failed validation at submission
    Invalid,
}

/// Main instruction plus the instructions that must run before it
pub struct BuiltInstruction {
    pub instruction: Instruction,
    pub prerequisites: Vec<Instruction>,
}

impl From<Instruction> for BuiltInstruction {
    fn from(instruction: Instruction) -> Self {
        Self {
            instruction,
            prerequisites: Vec::new(),
        }
    }
}

/// One proposal instruction form targeting the Adrena program
///
/// Implementations only describe their inputs, validation and account
/// wiring. The shared `get_instruction` turns every failure into an invalid
/// result with an empty payload.
pub trait InstructionBuilder {
    type Form: Default;

    const INSTRUCTION: AdrenaInstruction;

    fn governed_account(form: &Self::Form) -> Option<&GovernedAccount>;

    fn schema() -> Schema<Self::Form>;

    /// Inputs currently presented, as a pure function of form and data
    fn inputs(form: &Self::Form, snapshots: &Snapshots) -> Vec<InstructionInput>;

    /// Whether every snapshot the form depends on is loaded
    fn has_account_data(_form: &Self::Form, _snapshots: &Snapshots) -> bool {
        true
    }

    fn build(
        form: &Self::Form,
        snapshots: &Snapshots,
        ctx: &BuildContext,
        governed: &GovernedAccount,
    ) -> Result<BuiltInstruction>;

    fn state(form: &Self::Form, snapshots: &Snapshots) -> BuilderState {
        if Self::governed_account(form).is_none() {
            BuilderState::Unconfigured
        } else if !Self::has_account_data(form, snapshots) {
            BuilderState::AwaitingAccountData
        } else {
            BuilderState::Ready
        }
    }

    fn get_instruction(form: &Self::Form, snapshots: &Snapshots, ctx: &BuildContext) -> UiInstruction {
        let governed = Self::governed_account(form);
        let governance = governed.map(|governed| &governed.governance);

        if !Self::schema().validate(form).is_valid() {
            return UiInstruction::invalid(governance);
        }
        let Some(governed) = governed else {
            return UiInstruction::invalid(None);
        };

        match Self::build(form, snapshots, ctx, governed) {
            Ok(built) => {
                debug!(
                    "Built {} for program {}",
                    Self::INSTRUCTION.name(),
                    governed.pubkey
                );
                UiInstruction::valid(&built.instruction, &governed.governance)
                    .with_prerequisites(built.prerequisites)
            }
            Err(err) => {
                debug!("Cannot build {}: {}", Self::INSTRUCTION.name(), err);
                UiInstruction::invalid(governance)
            }
        }
    }
}

/// A form and the data it is built against, registered in a proposal slot
pub struct FormProvider<'a, B: InstructionBuilder> {
    pub form: B::Form,
    pub snapshots: Snapshots,
    pub ctx: BuildContext<'a>,
    submitted: Option<bool>,
}

impl<'a, B: InstructionBuilder> FormProvider<'a, B> {
    pub fn new(form: B::Form, snapshots: Snapshots, ctx: BuildContext<'a>) -> Self {
        Self {
            form,
            snapshots,
            ctx,
            submitted: None,
        }
    }

    pub fn inputs(&self) -> Vec<InstructionInput> {
        B::inputs(&self.form, &self.snapshots)
    }

    /// Builds the instruction for submission, moving to `Submitted` or `Invalid`
    pub fn submit(&mut self) -> UiInstruction {
        let result = B::get_instruction(&self.form, &self.snapshots, &self.ctx);
        self.submitted = Some(result.is_valid);
        result
    }

    pub fn state(&self) -> BuilderState {
        match self.submitted {
            Some(true) => BuilderState::Submitted,
            Some(false) => BuilderState::Invalid,
            None => B::state(&self.form, &self.snapshots),
        }
    }

    /// Applies a form change, returning to the pre-submission states
    pub fn update(&mut self, edit: impl FnOnce(&mut B::Form)) {
        edit(&mut self.form);
        self.submitted = None;
    }
}

impl<B: InstructionBuilder> InstructionProvider for FormProvider<'_, B> {
    fn governance(&self) -> Option<Governance> {
        B::governed_account(&self.form).map(|governed| governed.governance)
    }

    fn get_instruction(&self) -> UiInstruction {
        B::get_instruction(&self.form, &self.snapshots, &self.ctx)
    }
}

/// Adrena operations available in proposals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdrenaInstruction {
    AddCustody,
    AddVest,
    MintLmTokensFromBucket,
    GenesisOtcIn,
    GenesisOtcOut,
    SetCustodyAllowSwap,
    SetCustodyAllowTrade,
    SetCustodyConfig,
    SetCustodyMaxCumulativeShortPositionSizeUsd,
    SetPoolAllowSwap,
    SetPoolAllowTrade,
    SetPoolAumSoftCapUsd,
    SetPoolLiquidityState,
    SetStakingLmEmissionPotentiometers,
}

impl AdrenaInstruction {
    pub const ALL: [AdrenaInstruction; 14] = [
        AdrenaInstruction::AddCustody,
        AdrenaInstruction::AddVest,
        AdrenaInstruction::MintLmTokensFromBucket,
        AdrenaInstruction::GenesisOtcIn,
        AdrenaInstruction::GenesisOtcOut,
        AdrenaInstruction::SetCustodyAllowSwap,
        AdrenaInstruction::SetCustodyAllowTrade,
        AdrenaInstruction::SetCustodyConfig,
        AdrenaInstruction::SetCustodyMaxCumulativeShortPositionSizeUsd,
        AdrenaInstruction::SetPoolAllowSwap,
        AdrenaInstruction::SetPoolAllowTrade,
        AdrenaInstruction::SetPoolAumSoftCapUsd,
        AdrenaInstruction::SetPoolLiquidityState,
        AdrenaInstruction::SetStakingLmEmissionPotentiometers,
    ];

    /// On-chain instruction name
    pub fn ix_name(&self) -> &'static str {
        match self {
            AdrenaInstruction::AddCustody => "add_custody",
            AdrenaInstruction::AddVest => "add_vest",
            AdrenaInstruction::MintLmTokensFromBucket => "mint_lm_tokens_from_bucket",
            AdrenaInstruction::GenesisOtcIn => "genesis_otc_in",
            AdrenaInstruction::GenesisOtcOut => "genesis_otc_out",
            AdrenaInstruction::SetCustodyAllowSwap => "set_custody_allow_swap",
            AdrenaInstruction::SetCustodyAllowTrade => "set_custody_allow_trade",
            AdrenaInstruction::SetCustodyConfig => "set_custody_config",
            AdrenaInstruction::SetCustodyMaxCumulativeShortPositionSizeUsd => {
                "set_custody_max_cumulative_short_position_size_usd"
            }
            AdrenaInstruction::SetPoolAllowSwap => "set_pool_allow_swap",
            AdrenaInstruction::SetPoolAllowTrade => "set_pool_allow_trade",
            AdrenaInstruction::SetPoolAumSoftCapUsd => "set_pool_aum_soft_cap_usd",
            AdrenaInstruction::SetPoolLiquidityState => "set_pool_liquidity_state",
            AdrenaInstruction::SetStakingLmEmissionPotentiometers => {
                "set_staking_lm_emission_potentiometers"
            }
        }
    }

    /// Name shown in proposals
    pub fn name(&self) -> &'static str {
        match self {
            AdrenaInstruction::AddCustody => "Add Custody",
            AdrenaInstruction::AddVest => "Add Vest",
            AdrenaInstruction::MintLmTokensFromBucket => "Mint Lm Tokens From Bucket",
            AdrenaInstruction::GenesisOtcIn => "Genesis OTC In",
            AdrenaInstruction::GenesisOtcOut => "Genesis OTC Out",
            AdrenaInstruction::SetCustodyAllowSwap => "Set Custody Allow Swap",
            AdrenaInstruction::SetCustodyAllowTrade => "Set Custody Allow Trade",
            AdrenaInstruction::SetCustodyConfig => "Set Custody Config",
            AdrenaInstruction::SetCustodyMaxCumulativeShortPositionSizeUsd => {
                "Set Custody Max Cumulative Short Size USD"
            }
            AdrenaInstruction::SetPoolAllowSwap => "Set Pool Allow Swap",
            AdrenaInstruction::SetPoolAllowTrade => "Set Pool Allow Trade",
            AdrenaInstruction::SetPoolAumSoftCapUsd => "Set Pool Aum Soft Cap USD",
            AdrenaInstruction::SetPoolLiquidityState => "Set Pool Liquidity State",
            AdrenaInstruction::SetStakingLmEmissionPotentiometers => {
                "Set Staking Lm Emission Potentiometers"
            }
        }
    }

    pub fn discriminator(&self) -> [u8; 8] {
        ix_discriminator(self.ix_name())
    }

    pub fn from_data(data: &[u8]) -> Option<Self> {
        let discriminator = data.get(..8)?;
        Self::ALL
            .into_iter()
            .find(|instruction| instruction.discriminator() == discriminator)
    }
}

/// Human readable name of the Adrena instruction encoded in `data`
pub fn describe_instruction(data: &[u8]) -> Option<&'static str> {
    AdrenaInstruction::from_data(data).map(|instruction| instruction.name())
}

/// Address entered in a form field
pub(crate) fn field_pubkey(value: &Option<String>) -> Result<Pubkey> {
    Ok(parse_pubkey(value.as_deref()).ok_or(BuilderErrorCode::InvalidField)?)
}

pub(crate) fn field_number(value: Option<f64>) -> Result<f64> {
    Ok(value
        .filter(|value| value.is_finite())
        .ok_or(BuilderErrorCode::InvalidField)?)
}

pub(crate) fn pool_input(snapshots: &Snapshots, selected: Option<Pubkey>) -> InstructionInput {
    let options = snapshots
        .pools
        .iter()
        .flatten()
        .map(|pool| pool.account.display_name())
        .collect();
    let selected = snapshots
        .pool(selected)
        .map(|pool| pool.account.display_name());

    InstructionInput::select("Pool", "pool", options, selected)
}

pub(crate) fn custody_input(snapshots: &Snapshots, selected: Option<Pubkey>) -> InstructionInput {
    let options = snapshots
        .custodies
        .iter()
        .flatten()
        .filter(|slot| slot.custody.is_some())
        .map(|slot| slot.pubkey.to_string())
        .collect();
    let selected = snapshots.custody(selected).map(|custody| custody.pubkey.to_string());

    InstructionInput::select("Custody", "custody", options, selected)
}

/// Label suffix of a pool custody slot in ratio inputs
pub(crate) fn custody_slot_label(address: &Pubkey) -> String {
    if *address == Pubkey::default() {
        "-".to_string()
    } else {
        short_address(address)
    }
}

/// Min, target and max inputs of one ratio slot
pub(crate) fn ratio_inputs(
    slot: usize,
    suffix: &str,
    values: [Option<f64>; 3],
) -> Vec<InstructionInput> {
    let n = slot + 1;
    let [min, target, max] = values;
    vec![
        InstructionInput::number(
            format!("Custody {} Min Ratio ({})", n, suffix),
            format!("ratio{}Min", n),
            min,
        ),
        InstructionInput::number(
            format!("Custody {} Target Ratio ({})", n, suffix),
            format!("ratio{}Target", n),
            target,
        ),
        InstructionInput::number(
            format!("Custody {} Max Ratios ({})", n, suffix),
            format!("ratio{}Max", n),
            max,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminators_are_distinct() {
        let mut discriminators: Vec<[u8; 8]> = AdrenaInstruction::ALL
            .iter()
            .map(AdrenaInstruction::discriminator)
            .collect();
        discriminators.sort();
        discriminators.dedup();

        assert_eq!(discriminators.len(), AdrenaInstruction::ALL.len());
    }

    #[test]
    fn test_describe_instruction() {
        let mut data = ix_discriminator("set_pool_allow_swap").to_vec();
        data.push(1);

        assert_eq!(describe_instruction(&data), Some("Set Pool Allow Swap"));
        assert_eq!(describe_instruction(&[1, 2, 3]), None);
        assert_eq!(describe_instruction(&[0u8; 16]), None);
    }
}
