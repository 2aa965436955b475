#![no_std]

pub mod campaign;
pub mod events;
pub mod income;
pub mod ledger;
pub mod redemption;

use common::access::{self, AdminTier};
use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Symbol, Vec};

pub use campaign::Campaign;
pub use income::IncomeState;
pub use ledger::UserAccount;
pub use redemption::{RedeemRequest, RedeemWindow};

use campaign::CampaignPlan;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const VERSION: Symbol = symbol_short!("VERSION");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const REWARD_VAULT: Symbol = symbol_short!("RWD_VLT");
const COOLDOWN: Symbol = symbol_short!("COOLDOWN");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND_TO: u32 = 518_400; // ~30 days

/// Storage layout revision written at initialization.
pub const STATE_VERSION: u32 = 1;

/// Suggested waiting period between `request_redeem` and `redeem`.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 7 * 86_400;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidZeroAmount = 4,
    CapacityExceeded = 5,
    CampaignInactive = 6,
    InsufficientRewardBudget = 7,
    CampaignRegression = 8,
    CapacityBelowCurrentSupply = 9,
    CampaignAlreadyEnded = 10,
    ZeroBalance = 11,
    RedeemableZeroAmount = 12,
    CooldownNotFinished = 13,
    ZeroAmountToClaim = 14,
    ZeroAddress = 15,
    TokensIdentical = 16,
    InsufficientBalance = 17,
    MathOverflow = 18,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingVault;

#[contractimpl]
impl StakingVault {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the vault.
    ///
    /// * `stake_token`  – SAC address of the asset users deposit.
    /// * `reward_token` – SAC address of the asset rewards are paid in.
    /// * `reward_vault` – account holding the reward budget; it must
    ///                    `approve` this contract before a campaign starts.
    /// * `cooldown`     – seconds between `request_redeem` and `redeem`.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        reward_vault: Address,
        cooldown: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }
        let this = env.current_contract_address();
        if stake_token == this || reward_token == this || reward_vault == this {
            return Err(ContractError::ZeroAddress);
        }

        let instance = env.storage().instance();
        instance.set(&INITIALIZED, &true);
        instance.set(&VERSION, &STATE_VERSION);
        instance.set(&STAKE_TOKEN, &stake_token);
        instance.set(&REWARD_TOKEN, &reward_token);
        instance.set(&REWARD_VAULT, &reward_vault);
        instance.set(&COOLDOWN, &cooldown);
        income::store(
            &env,
            &IncomeState {
                last_update: env.ledger().timestamp(),
                ..IncomeState::default()
            },
        );
        // TOT_STK and CAMPAIGN default to zero values when absent.

        access::bootstrap(&env, &admin);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, stake_token, reward_token, reward_vault, cooldown);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens from `caller` into a position owned by
    /// `on_behalf_of`.
    ///
    /// The index is refreshed with the pre-deposit supply and the beneficiary
    /// reconciled with their pre-deposit balance, so the new stake earns
    /// nothing for time that has already elapsed.
    pub fn stake(
        env: Env,
        caller: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidZeroAmount);
        }

        let now = env.ledger().timestamp();
        let current = campaign::load(&env);
        if !current.is_active(now) {
            return Err(ContractError::CampaignInactive);
        }
        let total = Self::total_staked(&env);
        let new_total = total
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        if new_total > current.max_deposit_capacity {
            return Err(ContractError::CapacityExceeded);
        }

        // 1. Flush the index and the beneficiary's reward at the old balances.
        let state = income::refresh(&env, &current, total)?;
        let mut account = ledger::settle(&env, &on_behalf_of, state.index)?;

        // 2. Grow the position and the supply.
        account.staked = account
            .staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        ledger::store(&env, &on_behalf_of, &account);
        env.storage().instance().set(&TOTAL_STAKED, &new_total);
        Self::extend_instance_ttl(&env);

        // 3. Pull the deposit last.
        token::Client::new(&env, &Self::stake_token(&env)?).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_staked(&env, caller, on_behalf_of, amount, new_total);

        Ok(())
    }

    // ── Redemption ──────────────────────────────────────────────────────────

    /// Burn up to `amount` of the caller's position into the redemption
    /// queue and return the request id.
    ///
    /// `amount` is clamped to the current position. The burned stake stops
    /// earning immediately; the tokens are released by `redeem` once the
    /// cooldown has elapsed.
    pub fn request_redeem(
        env: Env,
        caller: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if ledger::load(&env, &caller).staked <= 0 {
            return Err(ContractError::ZeroBalance);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidZeroAmount);
        }
        if recipient == env.current_contract_address() {
            return Err(ContractError::ZeroAddress);
        }

        let now = env.ledger().timestamp();
        let current = campaign::load(&env);
        let total = Self::total_staked(&env);

        // 1. Reconcile with the pre-burn balance.
        let state = income::refresh(&env, &current, total)?;
        let mut account = ledger::settle(&env, &caller, state.index)?;

        // 2. Burn the position.
        let amount = amount.min(account.staked);
        account.staked -= amount;
        ledger::store(&env, &caller, &account);
        env.storage()
            .instance()
            .set(&TOTAL_STAKED, &total.saturating_sub(amount));

        // 3. Queue the release.
        let request = redemption::enqueue(&env, &caller, &recipient, amount, now);
        Self::extend_instance_ttl(&env);

        let eligible_at = request.eligible_at(Self::cooldown(&env));
        events::publish_redeem_requested(&env, caller, request.id, recipient, amount, eligible_at);

        Ok(request.id)
    }

    /// Release a queued redemption whose cooldown has elapsed.
    ///
    /// Fails with `RedeemableZeroAmount` if `request_id` is unknown or was
    /// already redeemed, and with `CooldownNotFinished` before the cooldown
    /// ends.
    pub fn redeem(env: Env, caller: Address, request_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let now = env.ledger().timestamp();
        let current = campaign::load(&env);
        let state = income::refresh(&env, &current, Self::total_staked(&env))?;
        ledger::reconcile(&env, &caller, state.index, true)?;

        // Retire the slot before the transfer (checks-effects-interactions).
        let request = redemption::consume(&env, &caller, request_id, now, Self::cooldown(&env))?;
        Self::extend_instance_ttl(&env);

        token::Client::new(&env, &Self::stake_token(&env)?).transfer(
            &env.current_contract_address(),
            &request.recipient,
            &request.amount,
        );

        events::publish_redeemed(
            &env,
            caller,
            request_id,
            request.recipient,
            request.amount,
        );

        Ok(request.amount)
    }

    // ── Position transfer ───────────────────────────────────────────────────

    /// Move `amount` staked units from `from` to `to`.
    ///
    /// Both sides are reconciled before balances move, so reward earned so
    /// far stays with the account that earned it.
    pub fn transfer_position(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidZeroAmount);
        }
        if ledger::load(&env, &from).staked < amount {
            return Err(ContractError::InsufficientBalance);
        }
        if from == to {
            return Ok(());
        }

        let current = campaign::load(&env);
        let state = income::refresh(&env, &current, Self::total_staked(&env))?;

        let mut sender = ledger::settle(&env, &from, state.index)?;
        let mut receiver = ledger::settle(&env, &to, state.index)?;
        sender.staked -= amount;
        receiver.staked = receiver
            .staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        ledger::store(&env, &from, &sender);
        ledger::store(&env, &to, &receiver);
        Self::extend_instance_ttl(&env);

        events::publish_position_transferred(&env, from, to, amount);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay up to `amount` of the caller's reward to `recipient` from the
    /// reward vault and return what was paid.
    pub fn claim_reward(
        env: Env,
        caller: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if recipient == env.current_contract_address() {
            return Err(ContractError::ZeroAddress);
        }

        let current = campaign::load(&env);
        let state = income::refresh(&env, &current, Self::total_staked(&env))?;
        let mut account = ledger::settle(&env, &caller, state.index)?;

        let to_claim = amount.min(account.claimable);
        if to_claim <= 0 {
            return Err(ContractError::ZeroAmountToClaim);
        }

        // Book the payout before calling out to the reward token.
        account.claimable -= to_claim;
        ledger::store(&env, &caller, &account);
        income::record_claim(&env, to_claim)?;
        Self::extend_instance_ttl(&env);

        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        token::Client::new(&env, &reward_token).transfer_from(
            &env.current_contract_address(),
            &Self::reward_vault(&env)?,
            &recipient,
            &to_claim,
        );

        events::publish_reward_claimed(&env, caller, recipient, to_claim);

        Ok(to_claim)
    }

    // ── Campaign management ─────────────────────────────────────────────────

    /// Start a campaign, or replace the running one, paying `rate` per year
    /// for `duration` seconds from now.
    ///
    /// The index is flushed at the old rate first. The reward vault's
    /// allowance must cover both the reward already owed to stakers and
    /// `reward_budget`. Requires at least `CampaignManager` tier.
    pub fn start_campaign(
        env: Env,
        caller: Address,
        reward_budget: i128,
        duration: u64,
        rate: i128,
    ) -> Result<Campaign, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::CampaignManager)?;

        let now = env.ledger().timestamp();
        let current = campaign::load(&env);
        let total = Self::total_staked(&env);
        let state = income::refresh(&env, &current, total)?;

        let allowance = Self::vault_allowance(&env)?;
        let next = CampaignPlan {
            reward_budget,
            duration,
            rate,
        }
        .resolve(&current, now, state.outstanding(), allowance, total)?;

        campaign::store(&env, &next);
        Self::extend_instance_ttl(&env);

        events::publish_campaign_started(
            &env,
            reward_budget,
            next.rate,
            next.end_time,
            next.max_deposit_capacity,
        );

        Ok(next)
    }

    /// Stop accrual now. Fails with `CampaignAlreadyEnded` once the campaign
    /// has run out. Requires at least `CampaignManager` tier.
    pub fn end_campaign(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::CampaignManager)?;

        let now = env.ledger().timestamp();
        let mut current = campaign::load(&env);
        if now >= current.end_time {
            return Err(ContractError::CampaignAlreadyEnded);
        }

        income::refresh(&env, &current, Self::total_staked(&env))?;

        current.end_time = now;
        current.rate = 0;
        campaign::store(&env, &current);
        Self::extend_instance_ttl(&env);

        events::publish_campaign_ended(&env, now);

        Ok(())
    }

    /// Point reward payouts at a different vault account.
    /// Requires at least `CampaignManager` tier.
    pub fn set_reward_vault(env: Env, caller: Address, vault: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::CampaignManager)?;

        if vault == env.current_contract_address() {
            return Err(ContractError::ZeroAddress);
        }

        env.storage().instance().set(&REWARD_VAULT, &vault);
        Self::extend_instance_ttl(&env);

        events::publish_reward_vault_set(&env, vault);

        Ok(())
    }

    // ── Admin tier management ───────────────────────────────────────────────

    /// Assign `tier` to `target`. Only a `SuperAdmin` may call this.
    pub fn grant_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::grant(&env, &caller, &target, tier.clone()) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_admin_tier_changed(&env, caller, target, Some(tier));
        Ok(())
    }

    /// Remove every tier from `target`. Only a `SuperAdmin` may call this.
    pub fn revoke_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::revoke(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_admin_tier_changed(&env, caller, target, None);
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        access::tier_of(&env, &admin)
    }

    pub fn get_admins(env: Env) -> Vec<Address> {
        access::administrators(&env)
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Claimable plus not-yet-reconciled reward of `user` as of now.
    pub fn total_reward_balance(env: Env, user: Address) -> Result<i128, ContractError> {
        let state = Self::live_income(&env)?;
        ledger::reconcile(&env, &user, state.index, false)
    }

    /// Every live redemption request of `user`, oldest first.
    pub fn get_pending_requests(env: Env, user: Address) -> Vec<RedeemRequest> {
        redemption::pending(&env, &user, 0, u32::MAX)
    }

    /// At most `limit` live requests of `user` with id `>= from_id`.
    pub fn get_pending_requests_from(
        env: Env,
        user: Address,
        from_id: u64,
        limit: u32,
    ) -> Vec<RedeemRequest> {
        redemption::pending(&env, &user, from_id, limit)
    }

    pub fn get_redeem_request(env: Env, user: Address, request_id: u64) -> Option<RedeemRequest> {
        redemption::load_request(&env, &user, request_id)
    }

    pub fn get_redeem_window(env: Env, user: Address) -> RedeemWindow {
        redemption::window(&env, &user)
    }

    /// The global index as of the current ledger time.
    pub fn current_index(env: Env) -> Result<i128, ContractError> {
        Ok(Self::live_income(&env)?.index)
    }

    /// Income state as of the current ledger time.
    pub fn get_income_state(env: Env) -> Result<IncomeState, ContractError> {
        Self::live_income(&env)
    }

    pub fn campaign_end_time(env: Env) -> u64 {
        campaign::load(&env).end_time
    }

    pub fn get_campaign(env: Env) -> Campaign {
        campaign::load(&env)
    }

    pub fn max_deposit_capacity(env: Env) -> i128 {
        campaign::load(&env).max_deposit_capacity
    }

    /// Reward-vault allowance not yet spoken for by accrued reward.
    pub fn uncommitted_reward_budget(env: Env) -> Result<i128, ContractError> {
        let outstanding = Self::live_income(&env)?.outstanding();
        Ok(Self::vault_allowance(&env)?.saturating_sub(outstanding))
    }

    pub fn get_staked(env: Env, user: Address) -> i128 {
        ledger::load(&env, &user).staked
    }

    pub fn get_account(env: Env, user: Address) -> UserAccount {
        ledger::load(&env, &user)
    }

    pub fn get_total_staked(env: Env) -> i128 {
        Self::total_staked(&env)
    }

    pub fn get_cooldown(env: Env) -> u64 {
        Self::cooldown(&env)
    }

    pub fn get_reward_vault(env: Env) -> Result<Address, ContractError> {
        Self::reward_vault(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// The longest-serving `SuperAdmin`.
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::super_admins(&env)
            .first()
            .ok_or(ContractError::NotInitialized)
    }

    pub fn version(env: Env) -> u32 {
        env.storage().instance().get(&VERSION).unwrap_or(0)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert unless `caller` holds at least `min_tier`.
    fn require_admin_tier(
        env: &Env,
        caller: &Address,
        min_tier: &AdminTier,
    ) -> Result<(), ContractError> {
        if access::is_administrator(env, caller, min_tier) {
            return Ok(());
        }
        Err(ContractError::Unauthorized)
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }

    fn total_staked(env: &Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    fn cooldown(env: &Env) -> u64 {
        env.storage().instance().get(&COOLDOWN).unwrap_or(0)
    }

    fn stake_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn reward_vault(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_VAULT)
            .ok_or(ContractError::NotInitialized)
    }

    /// What the reward vault currently lets this contract spend.
    fn vault_allowance(env: &Env) -> Result<i128, ContractError> {
        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        Ok(token::Client::new(env, &reward_token)
            .allowance(&Self::reward_vault(env)?, &env.current_contract_address()))
    }

    /// Income state refreshed to now in memory only.
    fn live_income(env: &Env) -> Result<IncomeState, ContractError> {
        income::preview(env, &campaign::load(env), Self::total_staked(env))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
