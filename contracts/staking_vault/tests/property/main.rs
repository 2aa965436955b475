#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point.
//!
//! Run with:
//!
//! ```bash
//! cargo test -p staking_vault --test property
//! ```
//!
//! To increase the number of generated cases:
//!
//! ```bash
//! PROPTEST_CASES=512 cargo test -p staking_vault --test property
//! ```

mod accrual;

use proptest_derive::Arbitrary;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking_vault::{StakingVault, StakingVaultClient};

pub const DAY: u64 = 86_400;
pub const YEAR: u64 = 365 * DAY;
pub const WAD: i128 = 1_000_000_000_000_000_000;
pub const USERS: usize = 3;
pub const MAX_STAKE: i128 = 100_000_000_000;
pub const REWARD_BUDGET: i128 = 1_000_000_000_000;

/// A single action against the vault, by a user or by the admin. Failing
/// calls are expected (e.g. redeeming with no stake) and leave no trace.
#[derive(Arbitrary, Clone, Debug)]
pub enum Op {
    Stake {
        #[proptest(strategy = "0..USERS")]
        user: usize,
        #[proptest(strategy = "1..=MAX_STAKE")]
        amount: i128,
    },
    RequestRedeem {
        #[proptest(strategy = "0..USERS")]
        user: usize,
        #[proptest(strategy = "1..=MAX_STAKE")]
        amount: i128,
    },
    Claim {
        #[proptest(strategy = "0..USERS")]
        user: usize,
        #[proptest(strategy = "1..=MAX_STAKE")]
        amount: i128,
    },
    Transfer {
        #[proptest(strategy = "0..USERS")]
        from: usize,
        #[proptest(strategy = "0..USERS")]
        to: usize,
        #[proptest(strategy = "1..=MAX_STAKE")]
        amount: i128,
    },
    Redeem {
        #[proptest(strategy = "0..USERS")]
        user: usize,
        #[proptest(strategy = "0u64..8")]
        id: u64,
    },
    /// Restart (or extend) the campaign as the admin.
    StartCampaign {
        #[proptest(strategy = "1..=REWARD_BUDGET")]
        budget: i128,
        #[proptest(strategy = "1..=400 * DAY")]
        duration: u64,
        #[proptest(strategy = "1i128..=2_000")]
        rate_bps: i128,
    },
    EndCampaign,
    Advance {
        #[proptest(strategy = "0..=30 * DAY")]
        seconds: u64,
    },
}

pub struct Harness {
    pub env: Env,
    pub client: StakingVaultClient<'static>,
    pub admin: Address,
    pub users: Vec<Address>,
    pub stake_token: Address,
}

impl Harness {
    /// Initialized vault with a funded, approved reward vault and no campaign.
    pub fn new(cooldown: u64) -> Self {
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
        client.initialize(&admin, &stake_token, &reward_token, &vault, &cooldown);

        StellarAssetClient::new(&env, &reward_token).mint(&vault, &(10 * REWARD_BUDGET));
        TokenClient::new(&env, &reward_token).approve(
            &vault,
            &contract_id,
            &(10 * REWARD_BUDGET),
            &10_000,
        );

        let users = (0..USERS).map(|_| Address::generate(&env)).collect();

        Harness {
            env,
            client,
            admin,
            users,
            stake_token,
        }
    }

    /// Same as [`Harness::new`] with a one-year 10 % campaign already running.
    pub fn with_campaign(cooldown: u64) -> Self {
        let h = Self::new(cooldown);
        h.client
            .start_campaign(&h.admin, &REWARD_BUDGET, &YEAR, &(WAD / 10));
        h
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().with_mut(|l| l.timestamp += seconds);
    }

    pub fn stake(&self, user: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.stake_token).mint(user, &amount);
        self.client.stake(user, user, &amount);
    }

    pub fn stake_balance(&self, user: &Address) -> i128 {
        TokenClient::new(&self.env, &self.stake_token).balance(user)
    }

    pub fn apply(&self, op: &Op) {
        match *op {
            Op::Stake { user, amount } => {
                let who = &self.users[user];
                StellarAssetClient::new(&self.env, &self.stake_token).mint(who, &amount);
                let _ = self.client.try_stake(who, who, &amount);
            }
            Op::RequestRedeem { user, amount } => {
                let who = &self.users[user];
                let _ = self.client.try_request_redeem(who, who, &amount);
            }
            Op::Claim { user, amount } => {
                let who = &self.users[user];
                let _ = self.client.try_claim_reward(who, who, &amount);
            }
            Op::Transfer { from, to, amount } => {
                let _ = self.client.try_transfer_position(
                    &self.users[from],
                    &self.users[to],
                    &amount,
                );
            }
            Op::Redeem { user, id } => {
                let _ = self.client.try_redeem(&self.users[user], &id);
            }
            Op::StartCampaign {
                budget,
                duration,
                rate_bps,
            } => {
                let rate = rate_bps * WAD / 10_000;
                let _ = self
                    .client
                    .try_start_campaign(&self.admin, &budget, &duration, &rate);
            }
            Op::EndCampaign => {
                let _ = self.client.try_end_campaign(&self.admin);
            }
            Op::Advance { seconds } => self.advance(seconds),
        }
    }

    /// Sum of every user's claimable plus pending reward.
    pub fn total_user_rewards(&self) -> i128 {
        self.users
            .iter()
            .map(|u| self.client.total_reward_balance(u))
            .sum()
    }
}
