//! Per-user reward bookkeeping.
//!
//! A user's reward is the stake they held multiplied by how far the global
//! index moved since their last snapshot. Reconciliation folds that amount
//! into `claimable` and moves the snapshot forward, so it must run before
//! any change to `staked`.

use common::fixed_point;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const ACCOUNT: Symbol = symbol_short!("ACCOUNT");

const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserAccount {
    pub staked: i128,
    /// Global index at the last reconciliation.
    pub last_index: i128,
    /// Reward already attributed to the user and not yet claimed.
    pub claimable: i128,
}

impl UserAccount {
    /// Reward earned since the last snapshot, floored.
    pub fn owed(&self, index: i128) -> Result<i128, ContractError> {
        let delta = index
            .checked_sub(self.last_index)
            .filter(|d| *d >= 0)
            .ok_or(ContractError::MathOverflow)?;
        fixed_point::wad_mul(self.staked, delta).ok_or(ContractError::MathOverflow)
    }

    /// `claimable` plus what is owed at `index`, without touching the account.
    pub fn total_reward(&self, index: i128) -> Result<i128, ContractError> {
        self.claimable
            .checked_add(self.owed(index)?)
            .ok_or(ContractError::MathOverflow)
    }

    /// Fold everything owed at `index` into `claimable`.
    pub fn reconcile(&mut self, index: i128) -> Result<i128, ContractError> {
        self.claimable = self.total_reward(index)?;
        self.last_index = index;
        Ok(self.claimable)
    }
}

fn account_key(user: &Address) -> (Symbol, Address) {
    (ACCOUNT, user.clone())
}

/// The stored account of `user`, or an empty one. Reading an existing
/// account keeps it live.
pub fn load(env: &Env, user: &Address) -> UserAccount {
    let key = account_key(user);
    let account: Option<UserAccount> = env.storage().persistent().get(&key);
    match account {
        Some(account) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            account
        }
        None => UserAccount::default(),
    }
}

pub fn store(env: &Env, user: &Address, account: &UserAccount) {
    let key = account_key(user);
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Load `user` and reconcile them to `index` in memory. The caller applies
/// its balance change and then calls [`store`].
pub fn settle(env: &Env, user: &Address, index: i128) -> Result<UserAccount, ContractError> {
    let mut account = load(env, user);
    account.reconcile(index)?;
    Ok(account)
}

/// Reconcile `user` to `index` and return their claimable total.
///
/// With `persist == false` the result is computed the same way but nothing
/// is written; balance queries use this path.
pub fn reconcile(
    env: &Env,
    user: &Address,
    index: i128,
    persist: bool,
) -> Result<i128, ContractError> {
    let account = settle(env, user, index)?;
    if persist {
        store(env, user, &account);
    }
    Ok(account.claimable)
}
