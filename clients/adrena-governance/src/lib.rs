//! Governance proposal instructions for the Adrena trading program.
//!
//! A proposal form selects a governed Adrena program account. Its address is
//! the program id every instruction targets and its governance treasury is
//! the `admin` signer. From there:
//! - `pda` derives the program's accounts from their seeds.
//! - `client` and `mirror` load cortex, pool, custody and staking snapshots,
//!   dropping fetches that were overtaken by newer ones.
//! - `instructions` holds one builder per Adrena operation. Each validates
//!   its form, lists the inputs it currently presents and produces the
//!   governance encoded instruction with its prerequisites.
//! - `proposal` encodes instructions for SPL governance and gathers the
//!   forms of a proposal by slot.
//!
//! Builders never fail loudly: missing data, a missing wallet or a failed
//! validation produce an invalid result with an empty payload.

pub mod client;
pub mod config;
pub mod constants;
pub mod forms;
pub mod instructions;
pub mod mirror;
pub mod pda;
pub mod proposal;
pub mod state;
pub mod utils;

pub use client::{AccountFetcher, AdrenaClient, MirrorError, MirrorResult};
pub use config::ClientConfig;
pub use instructions::{
    describe_instruction, AdrenaInstruction, BuildContext, BuilderState, FormProvider,
    InstructionBuilder, Snapshots,
};
pub use mirror::{AdrenaMirror, FetchSlot};
pub use pda::AdrenaPdas;
pub use proposal::{Governance, GovernedAccount, ProposalComposer, UiInstruction};
