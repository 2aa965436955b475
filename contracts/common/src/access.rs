use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN_TIER: Symbol = symbol_short!("ADM_TIER");
const ADMIN_LIST: Symbol = symbol_short!("ADM_LIST");

const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

// ── Admin Tier Enum ──────────────────────────────────────────────────────────

/// Administrator hierarchy for vault operations.
///
/// - `Operator`        – read-only operational role; holds no campaign rights.
/// - `CampaignManager` – may start and end reward campaigns and rotate the
///                       reward vault.
/// - `SuperAdmin`      – everything above, plus granting and revoking tiers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    Operator = 1,
    CampaignManager = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::Operator => 1,
            AdminTier::CampaignManager => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// True if this tier is at least as privileged as `required`.
    pub fn covers(&self, required: &AdminTier) -> bool {
        self.rank() >= required.rank()
    }
}

fn tier_key(admin: &Address) -> (Symbol, Address) {
    (ADMIN_TIER, admin.clone())
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn tier_of(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = tier_key(admin);
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    tier
}

/// The `isAdministrator` check: does `caller` hold at least `required`?
pub fn is_administrator(env: &Env, caller: &Address, required: &AdminTier) -> bool {
    tier_of(env, caller).is_some_and(|tier| tier.covers(required))
}

pub fn administrators(env: &Env) -> Vec<Address> {
    let admins: Option<Vec<Address>> = env.storage().persistent().get(&ADMIN_LIST);
    match admins {
        Some(admins) => {
            env.storage()
                .persistent()
                .extend_ttl(&ADMIN_LIST, TTL_THRESHOLD, TTL_EXTEND_TO);
            admins
        }
        None => Vec::new(env),
    }
}

fn store_administrators(env: &Env, admins: &Vec<Address>) {
    env.storage().persistent().set(&ADMIN_LIST, admins);
    env.storage()
        .persistent()
        .extend_ttl(&ADMIN_LIST, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Current `SuperAdmin`s in the order they were first registered.
pub fn super_admins(env: &Env) -> Vec<Address> {
    let mut supers = Vec::new(env);
    for admin in administrators(env).iter() {
        if tier_of(env, &admin) == Some(AdminTier::SuperAdmin) {
            supers.push_back(admin);
        }
    }
    supers
}

/// True if taking `SuperAdmin` away from `target` would leave none.
fn is_last_super_admin(env: &Env, target: &Address) -> bool {
    let supers = super_admins(env);
    supers.len() == 1 && supers.contains(target)
}

// ── Mutations ────────────────────────────────────────────────────────────────

fn write_tier(env: &Env, admin: &Address, tier: AdminTier) {
    let key = tier_key(admin);
    env.storage().persistent().set(&key, &tier);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let mut admins = administrators(env);
    if !admins.contains(admin) {
        admins.push_back(admin.clone());
        store_administrators(env, &admins);
    }
}

/// Record `admin` as the initial super administrator.
/// Callers must ensure this runs exactly once, during initialization.
pub fn bootstrap(env: &Env, admin: &Address) {
    write_tier(env, admin, AdminTier::SuperAdmin);
}

/// Assign `tier` to `target`. Returns `false` unless `caller` is a
/// `SuperAdmin`, or if the change would demote the last `SuperAdmin`; the
/// caller must already have been authenticated.
pub fn grant(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !is_administrator(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    if tier != AdminTier::SuperAdmin && is_last_super_admin(env, target) {
        return false;
    }
    write_tier(env, target, tier);
    true
}

/// Strip every tier from `target`. Same authorization rule as [`grant`].
pub fn revoke(env: &Env, caller: &Address, target: &Address) -> bool {
    if !is_administrator(env, caller, &AdminTier::SuperAdmin) || is_last_super_admin(env, target) {
        return false;
    }
    env.storage().persistent().remove(&tier_key(target));

    let admins = administrators(env);
    let mut kept = Vec::new(env);
    for admin in admins.iter() {
        if admin != *target {
            kept.push_back(admin);
        }
    }
    store_administrators(env, &kept);
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
