mod common;

use adrena_governance::instructions::{
    describe_instruction, AdrenaInstruction, BuilderState, FormProvider, InstructionBuilder,
    SetPoolAllowSwap, SetPoolAllowSwapForm, SetPoolAumSoftCapUsd, SetPoolAumSoftCapUsdForm,
    SetStakingLmEmissionPotentiometers, SetStakingLmEmissionPotentiometersForm, Snapshots,
};
use adrena_governance::proposal::{
    serialize_instruction_to_base64, InstructionProvider, ProposalComposer,
};
use common::*;

#[test]
fn test_composer_collects_in_slot_order() {
    let env = setup();
    let (pool, _) = env.add_main_pool(1);
    let staking = env.add_staking(0);
    let snapshots = env.snapshots(None);

    let swap = FormProvider::<SetPoolAllowSwap>::new(
        SetPoolAllowSwapForm {
            governed_account: Some(env.governed),
            allow: true,
            ..Default::default()
        },
        snapshots.clone(),
        env.ctx(),
    );
    let cap = FormProvider::<SetPoolAumSoftCapUsd>::new(
        SetPoolAumSoftCapUsdForm {
            governed_account: Some(env.governed),
            pool: Some(pool.pubkey),
            aum_soft_cap_usd: Some(5_000_000.0),
        },
        snapshots.clone(),
        env.ctx(),
    );
    let potentiometer = FormProvider::<SetStakingLmEmissionPotentiometers>::new(
        SetStakingLmEmissionPotentiometersForm {
            governed_account: Some(env.governed),
            staking: Some(staking.pubkey),
            lm_emission_potentiometer_bps: Some(100.0),
        },
        snapshots,
        env.ctx(),
    );

    let mut composer = ProposalComposer::new();
    composer.register(2, Box::new(potentiometer));
    composer.register(0, Box::new(swap));
    composer.register(1, Box::new(cap));

    let collected = composer.collect();
    let names: Vec<_> = collected
        .iter()
        .map(|(index, result)| (*index, describe_instruction(&decode(result).data)))
        .collect();

    assert_eq!(
        names,
        vec![
            (0, Some("Set Pool Allow Swap")),
            (1, Some("Set Pool Aum Soft Cap USD")),
            (2, Some("Set Staking Lm Emission Potentiometers")),
        ]
    );
    assert!(composer.is_ready());
    assert_eq!(
        composer.governances(),
        vec![Some(env.governed.governance); 3]
    );
}

#[test]
fn test_composer_not_ready_with_invalid_slot() {
    let env = setup();
    let mut composer = ProposalComposer::new();
    assert!(!composer.is_ready());

    composer.register(
        0,
        Box::new(FormProvider::<SetPoolAllowSwap>::new(
            SetPoolAllowSwapForm {
                governed_account: Some(env.governed),
                ..Default::default()
            },
            Snapshots::default(),
            env.ctx(),
        )),
    );
    assert!(composer.is_ready());

    composer.register(
        1,
        Box::new(FormProvider::<SetPoolAllowSwap>::new(
            SetPoolAllowSwapForm::default(),
            Snapshots::default(),
            env.ctx(),
        )),
    );
    assert!(!composer.is_ready());
    assert_eq!(composer.governances()[1], None);

    assert!(composer.unregister(1));
    assert!(!composer.unregister(1));
    assert_eq!(composer.len(), 1);
    assert!(composer.is_ready());
}

#[test]
fn test_register_replaces_slot() {
    let env = setup();
    let mut composer = ProposalComposer::new();
    let provider = |allow| {
        FormProvider::<SetPoolAllowSwap>::new(
            SetPoolAllowSwapForm {
                governed_account: Some(env.governed),
                allow,
                ..Default::default()
            },
            Snapshots::default(),
            env.ctx(),
        )
    };

    composer.register(0, Box::new(provider(false)));
    composer.register(0, Box::new(provider(true)));

    let collected = composer.collect();
    assert_eq!(collected.len(), 1);
    assert_eq!(*decode(&collected[0].1).data.last().unwrap(), 1);
}

#[test]
fn test_form_provider_states() {
    let env = setup();
    let (pool, _) = env.add_main_pool(1);
    let mut provider = FormProvider::<SetPoolAumSoftCapUsd>::new(
        SetPoolAumSoftCapUsdForm::default(),
        Snapshots::default(),
        env.ctx(),
    );
    assert_eq!(provider.state(), BuilderState::Unconfigured);

    provider.update(|form| form.governed_account = Some(env.governed));
    assert_eq!(provider.state(), BuilderState::AwaitingAccountData);

    provider.snapshots = env.snapshots(None);
    assert_eq!(provider.state(), BuilderState::Ready);

    // No pool selected yet
    assert!(!provider.submit().is_valid);
    assert_eq!(provider.state(), BuilderState::Invalid);

    provider.update(|form| form.pool = Some(pool.pubkey));
    assert_eq!(provider.state(), BuilderState::Ready);
    assert!(provider.submit().is_valid);
    assert_eq!(provider.state(), BuilderState::Submitted);
    assert_eq!(provider.inputs().len(), 3);
}

#[test]
fn test_provider_matches_builder_output() {
    let env = setup();
    let form = SetPoolAllowSwapForm {
        governed_account: Some(env.governed),
        allow: true,
        ..Default::default()
    };
    let expected = SetPoolAllowSwap::get_instruction(&form, &Snapshots::default(), &env.ctx());
    let provider = FormProvider::<SetPoolAllowSwap>::new(form, Snapshots::default(), env.ctx());

    assert_eq!(provider.get_instruction(), expected);
    assert_eq!(provider.governance(), Some(env.governed.governance));
    assert_eq!(
        expected.serialized_instruction,
        serialize_instruction_to_base64(&decode(&expected))
    );
}

#[test]
fn test_describe_every_instruction() {
    for instruction in AdrenaInstruction::ALL {
        let data = instruction.discriminator();

        assert_eq!(AdrenaInstruction::from_data(&data), Some(instruction));
        assert_eq!(describe_instruction(&data), Some(instruction.name()));
    }
    assert_eq!(describe_instruction(&[]), None);
}
