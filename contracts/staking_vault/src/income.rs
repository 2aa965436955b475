//! Normalized income tracker.
//!
//! The global index is the cumulative reward earned per staked unit since
//! deployment, scaled by [`WAD`]. It is never advanced by a timer: every
//! operation that can observe or change balances first brings the index up
//! to the current ledger time via [`refresh`].

use common::fixed_point::{self, WAD};
use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{campaign::Campaign, events, ContractError};

const INCOME: Symbol = symbol_short!("INCOME");

/// Global accrual state. Only [`accrue`] moves `index` and `total_accrued`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IncomeState {
    /// Cumulative reward per staked unit, WAD-scaled. Never decreases.
    pub index: i128,
    pub last_update: u64,
    /// Reward attributed to stakers since deployment, floored to whole units.
    pub total_accrued: i128,
    /// WAD-scaled remainder of `total_accrued` carried between refreshes.
    pub accrual_dust: i128,
    pub total_claimed: i128,
}

impl IncomeState {
    /// Reward owed to stakers and not yet paid out.
    pub fn outstanding(&self) -> i128 {
        self.total_accrued.saturating_sub(self.total_claimed)
    }
}

/// Advance `state` to `now` under `campaign`, with `total_supply` staked
/// across the whole elapsed interval.
///
/// Accrual stops at `campaign.end_time`, and nothing accrues while the pool
/// is empty. `last_update` always moves to `now` so that an interval without
/// stake (or past the campaign end) is skipped rather than credited later.
pub fn accrue(
    state: &IncomeState,
    campaign: &Campaign,
    now: u64,
    total_supply: i128,
) -> Result<IncomeState, ContractError> {
    let mut next = state.clone();
    if now <= state.last_update {
        return Ok(next);
    }
    next.last_update = now;

    let elapsed = now.min(campaign.end_time).saturating_sub(state.last_update);
    if total_supply <= 0 || elapsed == 0 || campaign.rate <= 0 {
        return Ok(next);
    }

    let growth =
        fixed_point::annual_growth(campaign.rate, elapsed).ok_or(ContractError::MathOverflow)?;
    next.index = state
        .index
        .checked_add(growth)
        .ok_or(ContractError::MathOverflow)?;

    // total_accrued == floor(Σ supply × growth / WAD) across all refreshes.
    let (whole, rem) =
        fixed_point::mul_div_rem(total_supply, growth, WAD).ok_or(ContractError::MathOverflow)?;
    let dust = state.accrual_dust + rem;
    next.accrual_dust = dust % WAD;
    next.total_accrued = state
        .total_accrued
        .checked_add(whole)
        .and_then(|v| v.checked_add(dust / WAD))
        .ok_or(ContractError::MathOverflow)?;

    Ok(next)
}

pub fn load(env: &Env) -> IncomeState {
    env.storage().instance().get(&INCOME).unwrap_or_default()
}

pub fn store(env: &Env, state: &IncomeState) {
    env.storage().instance().set(&INCOME, state);
}

/// The state as it would be after a refresh at the current ledger time,
/// without writing it.
pub fn preview(
    env: &Env,
    campaign: &Campaign,
    total_supply: i128,
) -> Result<IncomeState, ContractError> {
    accrue(&load(env), campaign, env.ledger().timestamp(), total_supply)
}

/// Bring the stored index up to the current ledger time.
pub fn refresh(
    env: &Env,
    campaign: &Campaign,
    total_supply: i128,
) -> Result<IncomeState, ContractError> {
    let current = load(env);
    let next = accrue(&current, campaign, env.ledger().timestamp(), total_supply)?;
    if next != current {
        store(env, &next);
        if next.index != current.index {
            events::publish_index_updated(env, next.index, next.total_accrued);
        }
    }
    Ok(next)
}

/// Record a payout against the accrued total.
pub fn record_claim(env: &Env, amount: i128) -> Result<IncomeState, ContractError> {
    let mut state = load(env);
    state.total_claimed = state
        .total_claimed
        .checked_add(amount)
        .ok_or(ContractError::MathOverflow)?;
    store(env, &state);
    Ok(state)
}
