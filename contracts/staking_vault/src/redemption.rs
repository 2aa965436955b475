//! Per-user redemption queue.
//!
//! Ids are allocated from a per-user counter and never reused. Each user
//! keeps a `[start_id, end_id)` window over their not-yet-consumed requests
//! plus an explicit live count, so scans never revisit retired ids below
//! `start_id`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

const WINDOW: Symbol = symbol_short!("RDM_WIN");
const REQUEST: Symbol = symbol_short!("RDM_REQ");

const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

/// A queued redemption. Funds are released to `recipient` once the cooldown
/// that started at `cooldown_start` has elapsed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemRequest {
    pub id: u64,
    pub recipient: Address,
    pub amount: i128,
    pub cooldown_start: u64,
}

impl RedeemRequest {
    pub fn eligible_at(&self, cooldown: u64) -> u64 {
        self.cooldown_start.saturating_add(cooldown)
    }
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RedeemWindow {
    /// Lowest id that may still be live.
    pub start_id: u64,
    /// Next id to allocate.
    pub end_id: u64,
    pub live_count: u64,
}

fn window_key(owner: &Address) -> (Symbol, Address) {
    (WINDOW, owner.clone())
}

fn request_key(owner: &Address, id: u64) -> (Symbol, Address, u64) {
    (REQUEST, owner.clone(), id)
}

pub fn window(env: &Env, owner: &Address) -> RedeemWindow {
    let key = window_key(owner);
    let window: Option<RedeemWindow> = env.storage().persistent().get(&key);
    match window {
        Some(window) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            window
        }
        None => RedeemWindow::default(),
    }
}

fn store_window(env: &Env, owner: &Address, window: &RedeemWindow) {
    let key = window_key(owner);
    env.storage().persistent().set(&key, window);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// The live request stored under `id`, if any. Reading it keeps it live
/// through the cooldown.
pub fn load_request(env: &Env, owner: &Address, id: u64) -> Option<RedeemRequest> {
    let key = request_key(owner, id);
    let request = env
        .storage()
        .persistent()
        .get::<_, RedeemRequest>(&key)
        .filter(|r| r.amount != 0)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Some(request)
}

/// Append a request for `amount` and return it with its freshly
/// allocated id.
pub fn enqueue(
    env: &Env,
    owner: &Address,
    recipient: &Address,
    amount: i128,
    now: u64,
) -> RedeemRequest {
    let mut window = window(env, owner);
    let request = RedeemRequest {
        id: window.end_id,
        recipient: recipient.clone(),
        amount,
        cooldown_start: now,
    };

    let key = request_key(owner, request.id);
    env.storage().persistent().set(&key, &request);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    window.end_id = window.end_id.saturating_add(1);
    window.live_count = window.live_count.saturating_add(1);
    store_window(env, owner, &window);

    request
}

/// Retire request `id` if its cooldown has elapsed and return it.
///
/// The slot is removed before the caller pays out, so a second attempt on
/// the same id fails with `RedeemableZeroAmount`.
pub fn consume(
    env: &Env,
    owner: &Address,
    id: u64,
    now: u64,
    cooldown: u64,
) -> Result<RedeemRequest, ContractError> {
    let request = load_request(env, owner, id).ok_or(ContractError::RedeemableZeroAmount)?;
    if now < request.eligible_at(cooldown) {
        return Err(ContractError::CooldownNotFinished);
    }

    env.storage().persistent().remove(&request_key(owner, id));

    let mut window = window(env, owner);
    window.live_count = window.live_count.saturating_sub(1);
    if window.live_count == 0 {
        window.start_id = window.end_id;
    } else if id == window.start_id {
        // Each retired id is stepped over at most once.
        while window.start_id < window.end_id
            && load_request(env, owner, window.start_id).is_none()
        {
            window.start_id += 1;
        }
    }
    store_window(env, owner, &window);

    Ok(request)
}

/// Live requests of `owner` in ascending id order, starting at `from_id`
/// (clamped to the window start) and returning at most `limit` entries.
pub fn pending(env: &Env, owner: &Address, from_id: u64, limit: u32) -> Vec<RedeemRequest> {
    let window = window(env, owner);
    let mut out = Vec::new(env);
    let mut id = from_id.max(window.start_id);
    let mut seen: u64 = 0;

    while id < window.end_id && seen < window.live_count && out.len() < limit {
        if let Some(request) = load_request(env, owner, id) {
            out.push_back(request);
            seen += 1;
        }
        id += 1;
    }
    out
}
