use std::collections::BTreeMap;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;

/// A single declarative validation rule over a form
pub struct Rule<F> {
    pub field: &'static str,
    pub message: &'static str,
    check: fn(&F) -> bool,
}

/// Ordered validation rules of one instruction form
///
/// Rules are evaluated in order and the first failing rule of a field wins,
/// so each field reports at most one message.
pub struct Schema<F> {
    rules: Vec<Rule<F>>,
}

impl<F> Default for Schema<F> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<F> Schema<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &'static str, message: &'static str, check: fn(&F) -> bool) -> Self {
        self.rules.push(Rule {
            field,
            message,
            check,
        });
        self
    }

    pub fn validate(&self, form: &F) -> Validation {
        let mut errors = BTreeMap::new();
        for rule in &self.rules {
            if errors.contains_key(rule.field) {
                continue;
            }
            if !(rule.check)(form) {
                errors.insert(rule.field, rule.message);
            }
        }
        Validation { errors }
    }
}

/// Outcome of validating a form: one message per failing field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: BTreeMap<&'static str, &'static str>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }
}

/// Parses a user-entered base58 address, `None` when absent or malformed
pub fn parse_pubkey(value: Option<&str>) -> Option<Pubkey> {
    value.and_then(|value| Pubkey::from_str(value.trim()).ok())
}

pub fn is_valid_pubkey(value: &Option<String>) -> bool {
    parse_pubkey(value.as_deref()).is_some()
}

pub fn is_present_number(value: &Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

pub fn is_present_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.trim().is_empty())
}

/// How an input is rendered and edited
#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    /// Selector over the realm's governed program accounts
    GovernedAccount,
    Select { options: Vec<String> },
    Number,
    Text,
    Switch,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<Option<f64>> for InputValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(InputValue::Empty, InputValue::Number)
    }
}

impl From<Option<String>> for InputValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(InputValue::Empty, InputValue::Text)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

/// One input presented by an instruction form
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionInput {
    pub label: String,
    pub name: String,
    pub kind: InputKind,
    pub initial_value: InputValue,
}

impl InstructionInput {
    pub fn new(
        label: impl Into<String>,
        name: impl Into<String>,
        kind: InputKind,
        initial_value: impl Into<InputValue>,
    ) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            kind,
            initial_value: initial_value.into(),
        }
    }

    pub fn governed_account(selected: Option<Pubkey>) -> Self {
        Self::new(
            "Governance",
            "governedAccount",
            InputKind::GovernedAccount,
            selected.map(|pubkey| pubkey.to_string()),
        )
    }

    pub fn select(
        label: &str,
        name: &str,
        options: Vec<String>,
        selected: Option<String>,
    ) -> Self {
        Self::new(label, name, InputKind::Select { options }, selected)
    }

    pub fn number(label: impl Into<String>, name: impl Into<String>, value: Option<f64>) -> Self {
        Self::new(label, name, InputKind::Number, value)
    }

    pub fn text(label: &str, name: &str, value: Option<String>) -> Self {
        Self::new(label, name, InputKind::Text, value)
    }

    pub fn switch(label: &str, name: &str, value: bool) -> Self {
        Self::new(label, name, InputKind::Switch, value)
    }
}

/// Names of the inputs, in presentation order
pub fn input_names(inputs: &[InstructionInput]) -> Vec<&str> {
    inputs.iter().map(|input| input.name.as_str()).collect()
}

/// Shortened base58 address used in labels
pub fn short_address(address: &Pubkey) -> String {
    address.to_string().chars().take(4).collect()
}
