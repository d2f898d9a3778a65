use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ::log::debug;
use solana_sdk::instruction::{AccountMeta, Instruction};

/// Governance treasury controlling a governed program
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Governance {
    pub pubkey: Pubkey,
    /// Signs executed proposal instructions, acts as the Adrena `admin`
    pub native_treasury_address: Pubkey,
}

/// A program account governed by the realm, selected in a form
///
/// `pubkey` is the governed program id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GovernedAccount {
    pub pubkey: Pubkey,
    pub governance: Governance,
}

/// Output of an instruction form, handed to the proposal composer
#[derive(Clone, Debug, PartialEq)]
pub struct UiInstruction {
    /// Base64 governance encoding of the instruction, empty when invalid
    pub serialized_instruction: String,
    /// Instructions that must execute before this one
    pub prerequisite_instructions: Vec<Instruction>,
    pub is_valid: bool,
    pub governance: Option<Pubkey>,
    pub chunk_by: u8,
}

impl UiInstruction {
    pub fn valid(instruction: &Instruction, governance: &Governance) -> Self {
        Self {
            serialized_instruction: serialize_instruction_to_base64(instruction),
            prerequisite_instructions: Vec::new(),
            is_valid: true,
            governance: Some(governance.pubkey),
            chunk_by: 1,
        }
    }

    /// A result that must not be submitted
    pub fn invalid(governance: Option<&Governance>) -> Self {
        Self {
            serialized_instruction: String::new(),
            prerequisite_instructions: Vec::new(),
            is_valid: false,
            governance: governance.map(|governance| governance.pubkey),
            chunk_by: 1,
        }
    }

    pub fn with_prerequisites(mut self, instructions: Vec<Instruction>) -> Self {
        self.prerequisite_instructions = instructions;
        self
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
struct GovernanceAccountMeta {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

/// Instruction layout stored in SPL governance proposal transactions
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
struct GovernanceInstructionData {
    program_id: Pubkey,
    accounts: Vec<GovernanceAccountMeta>,
    data: Vec<u8>,
}

impl From<&Instruction> for GovernanceInstructionData {
    fn from(instruction: &Instruction) -> Self {
        Self {
            program_id: instruction.program_id,
            accounts: instruction
                .accounts
                .iter()
                .map(|meta| GovernanceAccountMeta {
                    pubkey: meta.pubkey,
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: instruction.data.clone(),
        }
    }
}

impl From<GovernanceInstructionData> for Instruction {
    fn from(data: GovernanceInstructionData) -> Self {
        Instruction {
            program_id: data.program_id,
            accounts: data
                .accounts
                .into_iter()
                .map(|meta| AccountMeta {
                    pubkey: meta.pubkey,
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: data.data,
        }
    }
}

#[error_code]
pub enum ProposalErrorCode {
    #[msg("Serialized instruction is not valid base64")]
    InvalidBase64,
    #[msg("Serialized instruction is not a governance instruction")]
    InvalidInstructionData,
}

/// Encodes `instruction` the way SPL governance stores proposal instructions
pub fn serialize_instruction_to_base64(instruction: &Instruction) -> String {
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail
    let _ = GovernanceInstructionData::from(instruction).serialize(&mut bytes);
    STANDARD.encode(bytes)
}

/// Decodes an instruction produced by [`serialize_instruction_to_base64`]
///
/// # Errors
/// * `ProposalErrorCode::InvalidBase64` - If `encoded` is not standard base64
/// * `ProposalErrorCode::InvalidInstructionData` - If the bytes are not a
///   complete governance instruction
pub fn deserialize_instruction_from_base64(encoded: &str) -> Result<Instruction> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| error!(ProposalErrorCode::InvalidBase64))?;
    let data = GovernanceInstructionData::try_from_slice(&bytes)
        .map_err(|_| error!(ProposalErrorCode::InvalidInstructionData))?;

    Ok(data.into())
}

/// Produces the current instruction of one proposal slot
pub trait InstructionProvider {
    /// Governance selected in the slot's form, if any
    fn governance(&self) -> Option<Governance>;

    fn get_instruction(&self) -> UiInstruction;
}

/// Instruction slots of a proposal being composed
///
/// Forms register themselves under their slot index and are asked for their
/// instruction when the proposal is assembled.
#[derive(Default)]
pub struct ProposalComposer<'a> {
    providers: BTreeMap<usize, Box<dyn InstructionProvider + 'a>>,
}

impl<'a> ProposalComposer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` for slot `index`, replacing any previous one
    pub fn register(&mut self, index: usize, provider: Box<dyn InstructionProvider + 'a>) {
        debug!("Registering instruction provider for slot {}", index);
        self.providers.insert(index, provider);
    }

    pub fn unregister(&mut self, index: usize) -> bool {
        self.providers.remove(&index).is_some()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Current instruction of every slot, in slot order
    pub fn collect(&self) -> Vec<(usize, UiInstruction)> {
        self.providers
            .iter()
            .map(|(index, provider)| (*index, provider.get_instruction()))
            .collect()
    }

    /// True when there is at least one slot and every slot is valid
    pub fn is_ready(&self) -> bool {
        !self.providers.is_empty()
            && self
                .providers
                .values()
                .all(|provider| provider.get_instruction().is_valid)
    }

    /// Governances of the registered slots, in slot order
    pub fn governances(&self) -> Vec<Option<Governance>> {
        self.providers
            .values()
            .map(|provider| provider.governance())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_encoding_layout() {
        let program_id = Pubkey::new_unique();
        let signer = Pubkey::new_unique();
        let instruction = Instruction {
            program_id,
            accounts: vec![AccountMeta::new_readonly(signer, true)],
            data: vec![9, 8, 7],
        };

        let bytes = STANDARD
            .decode(serialize_instruction_to_base64(&instruction))
            .unwrap();

        assert_eq!(&bytes[..32], program_id.as_ref());
        assert_eq!(&bytes[32..36], &1u32.to_le_bytes());
        assert_eq!(&bytes[36..68], signer.as_ref());
        assert_eq!(&bytes[68..70], &[1, 0]);
        assert_eq!(&bytes[70..74], &3u32.to_le_bytes());
        assert_eq!(&bytes[74..], &[9, 8, 7]);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(deserialize_instruction_from_base64("@@@").is_err());
        assert!(deserialize_instruction_from_base64(&STANDARD.encode([1, 2, 3])).is_err());
    }

    #[test]
    fn test_invalid_result_is_empty() {
        let result = UiInstruction::invalid(None);

        assert!(!result.is_valid);
        assert!(result.serialized_instruction.is_empty());
        assert_eq!(result.chunk_by, 1);
    }
}
