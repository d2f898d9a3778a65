mod common;

use adrena_governance::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, GOVERNANCE_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use adrena_governance::instructions::{
    AddVest, AddVestForm, AddVestParams, BuildContext, InstructionBuilder,
    MintLmTokensFromBucket, MintLmTokensFromBucketForm, MintLmTokensFromBucketParams, Snapshots,
};
use adrena_governance::state::OriginBucket;
use common::*;
use solana_sdk::pubkey::Pubkey;

fn add_vest_form(env: &TestEnv, owner: Pubkey) -> AddVestForm {
    AddVestForm {
        governed_account: Some(env.governed),
        owner: Some(owner.to_string()),
        amount: Some(1_250.5),
        origin_bucket: OriginBucket::Foundation,
        unlock_start_timestamp: Some(1_700_000_000.0),
        unlock_end_timestamp: Some(1_730_000_000.0),
        vote_multiplier: Some(1.5),
    }
}

fn mint_form(env: &TestEnv, owner: Pubkey) -> MintLmTokensFromBucketForm {
    MintLmTokensFromBucketForm {
        governed_account: Some(env.governed),
        owner: Some(owner.to_string()),
        origin_bucket: OriginBucket::CoreContributor,
        amount: Some(42.0),
        reason: Some("Q3 contributor rewards".to_string()),
    }
}

#[test]
fn test_add_vest_without_owner_is_invalid() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    let form = AddVestForm {
        governed_account: Some(env.governed),
        owner: None,
        amount: Some(0.0),
        ..Default::default()
    };

    let result = AddVest::get_instruction(&form, &Snapshots::default(), &env.ctx());

    assert_invalid(&result);
    assert_eq!(
        AddVest::schema().validate(&form).error("owner"),
        Some("Owner is required")
    );
}

#[test]
fn test_add_vest() {
    let env = setup();
    let realm = Pubkey::new_unique();
    env.add_cortex(realm);
    let owner = Pubkey::new_unique();
    let pdas = &env.client.pdas;

    let ix = decode(&AddVest::get_instruction(
        &add_vest_form(&env, owner),
        &Snapshots::default(),
        &env.ctx(),
    ));
    let args: AddVestParams = decode_args(&ix, "add_vest");

    assert_eq!(args.amount, 1_250_500_000);
    assert_eq!(args.origin_bucket, OriginBucket::Foundation);
    assert_eq!(args.unlock_start_timestamp, 1_700_000_000);
    assert_eq!(args.unlock_end_timestamp, 1_730_000_000);
    assert_eq!(args.vote_multiplier, 15_000);
    assert_eq!(
        account_keys(&ix),
        vec![
            env.admin(),
            pdas.cortex,
            owner,
            env.payer,
            pdas.transfer_authority,
            pdas.vest_registry,
            pdas.vest(&owner),
            pdas.lm_token_mint,
            pdas.governance_token_mint,
            realm,
            pdas.governance_realm_config(&realm),
            pdas.governing_token_holding(&realm),
            pdas.governing_token_owner_record(&realm, &owner),
            GOVERNANCE_PROGRAM_ID,
            SYSTEM_PROGRAM_ID,
            TOKEN_PROGRAM_ID,
            RENT_SYSVAR_ID,
        ]
    );
    assert!(ix.accounts[0].is_signer && !ix.accounts[0].is_writable);
    assert!(ix.accounts[3].is_signer && ix.accounts[3].is_writable);
    assert!(!ix.accounts[2].is_writable);
}

#[test]
fn test_vest_amounts_follow_cortex_lm_decimals() {
    let env = setup();
    let mut cortex = env.add_cortex(Pubkey::new_unique());
    cortex.lm_token_decimals = 9;
    env.write(env.client.pdas.cortex, &cortex);
    let owner = Pubkey::new_unique();

    let vest_form = AddVestForm {
        amount: Some(1.0),
        ..add_vest_form(&env, owner)
    };
    let vest = decode(&AddVest::get_instruction(&vest_form, &Snapshots::default(), &env.ctx()));
    let vest_args: AddVestParams = decode_args(&vest, "add_vest");
    assert_eq!(vest_args.amount, 1_000_000_000);

    let mint = decode(&MintLmTokensFromBucket::get_instruction(
        &mint_form(&env, owner),
        &Snapshots::default(),
        &env.ctx(),
    ));
    let mint_args: MintLmTokensFromBucketParams = decode_args(&mint, "mint_lm_tokens_from_bucket");
    assert_eq!(mint_args.amount, 42_000_000_000);
}

#[test]
fn test_add_vest_uses_configured_governance_program() {
    let env = setup();
    let realm = Pubkey::new_unique();
    env.add_cortex(realm);
    let owner = Pubkey::new_unique();
    let governance_program_id = Pubkey::new_unique();
    let client = env.client.clone().with_governance_program(governance_program_id);
    let ctx = BuildContext::new(Some(&client), Some(env.payer));

    let ix = decode(&AddVest::get_instruction(
        &add_vest_form(&env, owner),
        &Snapshots::default(),
        &ctx,
    ));
    let keys = account_keys(&ix);

    assert_eq!(keys[13], governance_program_id);
    assert_eq!(
        keys[10],
        Pubkey::find_program_address(&[b"realm-config", realm.as_ref()], &governance_program_id).0
    );
    assert_eq!(keys[12], client.pdas.governing_token_owner_record(&realm, &owner));
    assert_ne!(keys[12], env.client.pdas.governing_token_owner_record(&realm, &owner));
}

#[test]
fn test_mint_lm_tokens_without_cortex_is_invalid() {
    let env = setup();

    assert_invalid(&MintLmTokensFromBucket::get_instruction(
        &mint_form(&env, Pubkey::new_unique()),
        &Snapshots::default(),
        &env.ctx(),
    ));
}

#[test]
fn test_add_vest_without_cortex_is_invalid() {
    let env = setup();
    let form = add_vest_form(&env, Pubkey::new_unique());

    assert_invalid(&AddVest::get_instruction(&form, &Snapshots::default(), &env.ctx()));
}

#[test]
fn test_add_vest_rejects_reversed_unlock_window() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    let form = AddVestForm {
        unlock_start_timestamp: Some(1_730_000_000.0),
        unlock_end_timestamp: Some(1_700_000_000.0),
        ..add_vest_form(&env, Pubkey::new_unique())
    };

    assert_eq!(
        AddVest::schema().validate(&form).error("unlockEndTimestamp"),
        Some("Unlock end timestamp must not precede the start")
    );
    assert_invalid(&AddVest::get_instruction(&form, &Snapshots::default(), &env.ctx()));
}

#[test]
fn test_mint_lm_tokens_creates_missing_token_account_first() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    let owner = Pubkey::new_unique();
    let pdas = &env.client.pdas;
    let receiving = pdas.lm_token_account(&owner);

    let result = MintLmTokensFromBucket::get_instruction(
        &mint_form(&env, owner),
        &Snapshots::default(),
        &env.ctx(),
    );
    let ix = decode(&result);
    let args: MintLmTokensFromBucketParams = decode_args(&ix, "mint_lm_tokens_from_bucket");

    assert_eq!(args.bucket_name, OriginBucket::CoreContributor);
    assert_eq!(args.amount, 42_000_000);
    assert_eq!(args.reason, "Q3 contributor rewards");
    assert_eq!(
        account_keys(&ix),
        vec![
            env.admin(),
            receiving,
            pdas.transfer_authority,
            pdas.cortex,
            pdas.lm_token_mint,
            TOKEN_PROGRAM_ID,
        ]
    );

    assert_eq!(result.prerequisite_instructions.len(), 1);
    let create = &result.prerequisite_instructions[0];
    assert_eq!(create.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
    assert_eq!(create.data, vec![1]);
    assert_eq!(
        account_keys(create)[..4],
        [env.payer, receiving, owner, pdas.lm_token_mint]
    );
}

#[test]
fn test_mint_lm_tokens_skips_existing_token_account() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    let owner = Pubkey::new_unique();
    env.fetcher.set_account(
        env.client.pdas.lm_token_account(&owner),
        TOKEN_PROGRAM_ID,
        vec![0; 165],
    );

    let result = MintLmTokensFromBucket::get_instruction(
        &mint_form(&env, owner),
        &Snapshots::default(),
        &env.ctx(),
    );

    assert!(result.is_valid);
    assert!(result.prerequisite_instructions.is_empty());
}

#[test]
fn test_mint_lm_tokens_requires_reason() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    let form = MintLmTokensFromBucketForm {
        reason: Some("  ".to_string()),
        ..mint_form(&env, Pubkey::new_unique())
    };

    assert_invalid(&MintLmTokensFromBucket::get_instruction(
        &form,
        &Snapshots::default(),
        &env.ctx(),
    ));
}

#[test]
fn test_mint_lm_tokens_offline_is_invalid() {
    let env = setup();
    env.add_cortex(Pubkey::new_unique());
    env.fetcher.set_offline(true);

    assert_invalid(&MintLmTokensFromBucket::get_instruction(
        &mint_form(&env, Pubkey::new_unique()),
        &Snapshots::default(),
        &env.ctx(),
    ));
}
