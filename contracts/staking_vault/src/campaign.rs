use common::fixed_point::{self, SECONDS_PER_YEAR, WAD};
use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const CAMPAIGN: Symbol = symbol_short!("CAMPAIGN");

/// The active reward epoch.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Campaign {
    /// Annualised yield as a fraction of `WAD`.
    pub rate: i128,
    /// Accrual stops here. Only ever moves forward, except when an admin
    /// ends the campaign early.
    pub end_time: u64,
    /// Total stake the reward budget can serve at `rate` until `end_time`.
    pub max_deposit_capacity: i128,
}

impl Campaign {
    pub fn is_active(&self, now: u64) -> bool {
        now < self.end_time && self.rate > 0
    }
}

/// Inputs to a campaign (re)start, checked against the current ledger state.
pub struct CampaignPlan {
    pub reward_budget: i128,
    pub duration: u64,
    pub rate: i128,
}

/// `reward_budget × WAD × SECONDS_PER_YEAR / (rate × duration)`, floored.
///
/// Evaluated as `(budget × WAD / rate) × SECONDS_PER_YEAR / duration` so a
/// realistic budget never overflows `i128`; the split can only round the
/// capacity down.
pub fn max_deposit_capacity(
    reward_budget: i128,
    duration: u64,
    rate: i128,
) -> Result<i128, ContractError> {
    if reward_budget <= 0 || duration == 0 || rate <= 0 {
        return Err(ContractError::InvalidZeroAmount);
    }
    let per_year = fixed_point::mul_div_floor(reward_budget, WAD, rate)
        .ok_or(ContractError::MathOverflow)?;
    fixed_point::mul_div_floor(
        per_year,
        i128::from(SECONDS_PER_YEAR),
        i128::from(duration),
    )
    .ok_or(ContractError::MathOverflow)
}

impl CampaignPlan {
    /// Validate the plan and produce the campaign it would install.
    ///
    /// * `committed` – reward accrued to stakers and not yet claimed.
    /// * `allowance` – what the reward vault currently lets this contract pull.
    /// * `total_staked` – current supply, which the new cap must still cover.
    pub fn resolve(
        &self,
        current: &Campaign,
        now: u64,
        committed: i128,
        allowance: i128,
        total_staked: i128,
    ) -> Result<Campaign, ContractError> {
        let max_deposit_capacity =
            max_deposit_capacity(self.reward_budget, self.duration, self.rate)?;

        let required = committed
            .checked_add(self.reward_budget)
            .ok_or(ContractError::MathOverflow)?;
        if required > allowance {
            return Err(ContractError::InsufficientRewardBudget);
        }

        let end_time = now
            .checked_add(self.duration)
            .ok_or(ContractError::MathOverflow)?;
        if end_time < current.end_time {
            return Err(ContractError::CampaignRegression);
        }

        if max_deposit_capacity < total_staked {
            return Err(ContractError::CapacityBelowCurrentSupply);
        }

        Ok(Campaign {
            rate: self.rate,
            end_time,
            max_deposit_capacity,
        })
    }
}

pub fn load(env: &Env) -> Campaign {
    env.storage().instance().get(&CAMPAIGN).unwrap_or_default()
}

pub fn store(env: &Env, campaign: &Campaign) {
    env.storage().instance().set(&CAMPAIGN, campaign);
}
