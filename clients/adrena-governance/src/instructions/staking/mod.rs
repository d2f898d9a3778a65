pub mod set_staking_lm_emission_potentiometers;

pub use set_staking_lm_emission_potentiometers::*;
