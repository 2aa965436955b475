#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking_vault::{StakingVault, StakingVaultClient};

const WAD: i128 = 1_000_000_000_000_000_000;
const BUDGET: i128 = 1_000_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { beneficiary: u8, amount: u32 },
    RequestRedeem { amount: u64 },
    Redeem { id: u8 },
    Claim { amount: u64 },
    Transfer { to: u8, amount: u64 },
    StartCampaign { budget: u64, days: u16, rate_bps: u16 },
    EndCampaign,
    Advance { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingVault, ());
    let client = StakingVaultClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let vault = Address::generate(&env);
    client.initialize(&admin, &stake_token, &reward_token, &vault, &3_600);

    StellarAssetClient::new(&env, &reward_token).mint(&vault, &(10 * BUDGET));
    TokenClient::new(&env, &reward_token).approve(&vault, &contract_id, &(10 * BUDGET), &10_000);
    let _ = client.try_start_campaign(&admin, &BUDGET, &(90 * 86_400), &(WAD / 10));

    let mut users = vec![admin.clone()];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }
    let stake = StellarAssetClient::new(&env, &stake_token);

    // Every call may fail; the invariants below must hold regardless.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { beneficiary, amount } => {
                let amt = amount as i128;
                if amt > 0 {
                    stake.mint(caller, &amt);
                }
                let to = &users[beneficiary as usize % users.len()];
                let _ = client.try_stake(caller, to, &amt);
            }
            FuzzAction::RequestRedeem { amount } => {
                let _ = client.try_request_redeem(caller, caller, &(amount as i128));
            }
            FuzzAction::Redeem { id } => {
                let _ = client.try_redeem(caller, &(id as u64));
            }
            FuzzAction::Claim { amount } => {
                let _ = client.try_claim_reward(caller, caller, &(amount as i128));
            }
            FuzzAction::Transfer { to, amount } => {
                let to = &users[to as usize % users.len()];
                let _ = client.try_transfer_position(caller, to, &(amount as i128));
            }
            FuzzAction::StartCampaign {
                budget,
                days,
                rate_bps,
            } => {
                let rate = rate_bps as i128 * WAD / 10_000;
                let _ = client.try_start_campaign(
                    &admin,
                    &(budget as i128),
                    &(days as u64 * 86_400),
                    &rate,
                );
            }
            FuzzAction::EndCampaign => {
                let _ = client.try_end_campaign(&admin);
            }
            FuzzAction::Advance { seconds } => {
                env.ledger().with_mut(|l| l.timestamp += seconds as u64);
            }
        }

        let state = client.get_income_state();
        let owed: i128 = users.iter().map(|u| client.total_reward_balance(u)).sum();
        assert!(owed <= state.total_accrued - state.total_claimed);

        let staked: i128 = users.iter().map(|u| client.get_staked(u)).sum();
        assert_eq!(staked, client.get_total_staked());
        assert!(staked <= client.max_deposit_capacity() || client.get_campaign().rate == 0);
    }
});
