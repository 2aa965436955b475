#![allow(deprecated)] // events().publish migration tracked separately

use common::AdminTier;
use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the vault is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_vault: Address,
    pub cooldown: u64,
    pub timestamp: u64,
}

/// Fired when a deposit opens or grows a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub payer: Address,
    pub beneficiary: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when part of a position is burned into the redemption queue.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemRequestedEvent {
    pub owner: Address,
    pub request_id: u64,
    pub recipient: Address,
    pub amount: i128,
    pub eligible_at: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemedEvent {
    pub owner: Address,
    pub request_id: u64,
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionTransferredEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an admin starts or extends a campaign.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignStartedEvent {
    pub reward_budget: i128,
    pub rate: i128,
    pub end_time: u64,
    pub max_deposit_capacity: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignEndedEvent {
    pub end_time: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardVaultSetEvent {
    pub vault: Address,
    pub timestamp: u64,
}

/// Fired whenever a refresh moves the global index.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexUpdatedEvent {
    pub index: i128,
    pub total_accrued: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTierChangedEvent {
    pub caller: Address,
    pub target: Address,
    /// Rank of the new tier, `None` when every tier was revoked.
    pub tier: Option<u32>,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    reward_token: Address,
    reward_vault: Address,
    cooldown: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            reward_token,
            reward_vault,
            cooldown,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    payer: Address,
    beneficiary: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), beneficiary.clone()),
        StakedEvent {
            payer,
            beneficiary,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_redeem_requested(
    env: &Env,
    owner: Address,
    request_id: u64,
    recipient: Address,
    amount: i128,
    eligible_at: u64,
) {
    env.events().publish(
        (symbol_short!("RDM_REQ"), owner.clone()),
        RedeemRequestedEvent {
            owner,
            request_id,
            recipient,
            amount,
            eligible_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_redeemed(
    env: &Env,
    owner: Address,
    request_id: u64,
    recipient: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("REDEEMED"), owner.clone()),
        RedeemedEvent {
            owner,
            request_id,
            recipient,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), staker.clone()),
        RewardClaimedEvent {
            staker,
            recipient,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_position_transferred(env: &Env, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("POS_XFER"), from.clone(), to.clone()),
        PositionTransferredEvent {
            from,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_campaign_started(
    env: &Env,
    reward_budget: i128,
    rate: i128,
    end_time: u64,
    max_deposit_capacity: i128,
) {
    env.events().publish(
        (symbol_short!("CMP_START"),),
        CampaignStartedEvent {
            reward_budget,
            rate,
            end_time,
            max_deposit_capacity,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_campaign_ended(env: &Env, end_time: u64) {
    env.events().publish(
        (symbol_short!("CMP_END"),),
        CampaignEndedEvent {
            end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_vault_set(env: &Env, vault: Address) {
    env.events().publish(
        (symbol_short!("VAULT_SET"),),
        RewardVaultSetEvent {
            vault,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_index_updated(env: &Env, index: i128, total_accrued: i128) {
    env.events().publish(
        (symbol_short!("IDX_UPD"),),
        IndexUpdatedEvent {
            index,
            total_accrued,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_tier_changed(
    env: &Env,
    caller: Address,
    target: Address,
    tier: Option<AdminTier>,
) {
    env.events().publish(
        (symbol_short!("ADM_TIER"), target.clone()),
        AdminTierChangedEvent {
            caller,
            target,
            tier: tier.map(|t| t.rank()),
            timestamp: env.ledger().timestamp(),
        },
    );
}
