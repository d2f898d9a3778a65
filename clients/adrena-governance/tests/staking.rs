mod common;

use adrena_governance::forms::{InputKind, InputValue};
use adrena_governance::instructions::{
    BuilderState, InstructionBuilder, SetStakingLmEmissionPotentiometers,
    SetStakingLmEmissionPotentiometersForm, SetStakingLmEmissionPotentiometersParams, Snapshots,
};
use common::*;
use solana_sdk::pubkey::Pubkey;

#[test]
fn test_set_staking_lm_emission_potentiometers() {
    let env = setup();
    let staking = env.add_staking(1);
    let form = SetStakingLmEmissionPotentiometersForm {
        governed_account: Some(env.governed),
        staking: Some(staking.pubkey),
        lm_emission_potentiometer_bps: Some(7_500.0),
    };

    let ix = decode(&SetStakingLmEmissionPotentiometers::get_instruction(
        &form,
        &env.snapshots(None),
        &env.ctx(),
    ));
    let args: SetStakingLmEmissionPotentiometersParams =
        decode_args(&ix, "set_staking_lm_emission_potentiometers");

    assert_eq!(args.lm_emission_potentiometer_bps, 7_500);
    assert_eq!(
        account_keys(&ix),
        vec![env.admin(), env.client.pdas.cortex, staking.pubkey]
    );
    assert!(!ix.accounts[1].is_writable);
    assert!(ix.accounts[2].is_writable);
}

#[test]
fn test_potentiometer_above_max_bps_is_invalid() {
    let env = setup();
    let staking = env.add_staking(0);
    let form = SetStakingLmEmissionPotentiometersForm {
        governed_account: Some(env.governed),
        staking: Some(staking.pubkey),
        lm_emission_potentiometer_bps: Some(10_001.0),
    };

    assert_eq!(
        SetStakingLmEmissionPotentiometers::schema()
            .validate(&form)
            .error("lmEmissionPotentiometerBps"),
        Some("LM emission potentiometer BPS must be between 0 and 10000")
    );
    assert_invalid(&SetStakingLmEmissionPotentiometers::get_instruction(
        &form,
        &env.snapshots(None),
        &env.ctx(),
    ));
}

#[test]
fn test_unknown_staking_is_invalid() {
    let env = setup();
    env.add_staking(0);
    let form = SetStakingLmEmissionPotentiometersForm {
        governed_account: Some(env.governed),
        staking: Some(Pubkey::new_unique()),
        ..Default::default()
    };

    assert_invalid(&SetStakingLmEmissionPotentiometers::get_instruction(
        &form,
        &env.snapshots(None),
        &env.ctx(),
    ));
}

#[test]
fn test_staking_inputs_list_loaded_stakings() {
    let env = setup();
    let lm = env.add_staking(0);
    let form = SetStakingLmEmissionPotentiometersForm {
        governed_account: Some(env.governed),
        staking: Some(lm.pubkey),
        ..Default::default()
    };

    assert_eq!(
        SetStakingLmEmissionPotentiometers::state(&form, &Snapshots::default()),
        BuilderState::AwaitingAccountData
    );

    let snapshots = env.snapshots(None);
    let inputs = SetStakingLmEmissionPotentiometers::inputs(&form, &snapshots);
    let staking_input = &inputs[2];

    assert_eq!(
        staking_input.kind,
        InputKind::Select {
            options: vec![lm.pubkey.to_string()]
        }
    );
    assert_eq!(staking_input.initial_value, InputValue::Text(lm.pubkey.to_string()));
    assert_eq!(inputs[1].initial_value, InputValue::Number(0.0));
    assert_eq!(
        SetStakingLmEmissionPotentiometers::state(&form, &snapshots),
        BuilderState::Ready
    );
}
