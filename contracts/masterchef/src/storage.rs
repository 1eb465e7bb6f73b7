use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage key constants ───────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
/// Token paid out as the primary reward.
const REWARD_TOK: Symbol = symbol_short!("RWD_TOK");
/// Reward tokens emitted per ledger, constant after initialization.
const REWARD_PER_BLOCK: Symbol = symbol_short!("RPB");
/// Ledger sequence before which no rewards accrue.
const START_BLOCK: Symbol = symbol_short!("START");
const POOL_COUNT: Symbol = symbol_short!("NPOOLS");
/// Sum of all pool weights, maintained incrementally on add/set.
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGT");
const REWARDER: Symbol = symbol_short!("REWARDER");

const POOL: Symbol = symbol_short!("POOL");
const ASSET: Symbol = symbol_short!("ASSET");
const USER: Symbol = symbol_short!("USER");

const TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

// ── Types ───────────────────────────────────────────────────────────────────

/// One reward-distribution bucket, bound to exactly one staking asset.
///
/// `acc_reward_per_share` is scaled by [`common::math::PRECISION`] and is
/// monotonically non-decreasing while `total_staked > 0`. Pools are never
/// deleted; a pool retired with weight zero keeps its history.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    /// The fungible asset this pool accepts; unique across all pools.
    pub staking_asset: Address,
    /// Allocation weight: this pool's share of the global emission rate is
    /// `weight / total_weight`.
    pub weight: u32,
    /// Cumulative reward per staked unit, scaled by PRECISION.
    pub acc_reward_per_share: i128,
    /// Ledger sequence at which the accumulator was last advanced.
    pub last_reward_block: u32,
    /// Total currently staked in this pool.
    pub total_staked: i128,
}

/// Per-(pool, depositor) position, created lazily on first deposit and
/// zeroed (not removed) on emergency exit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    /// Currently staked balance.
    pub amount: i128,
    /// Reward already accounted for at the last balance change, stored
    /// scaled down to token units.
    pub reward_debt: i128,
}

impl UserPosition {
    pub fn zero() -> Self {
        UserPosition {
            amount: 0,
            reward_debt: 0,
        }
    }
}

// ── Instance state ──────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

pub fn set_reward_token(env: &Env, token: &Address) {
    env.storage().instance().set(&REWARD_TOK, token);
}

pub fn get_reward_token(env: &Env) -> Address {
    // Set during initialize, present for the contract's lifetime.
    env.storage().instance().get(&REWARD_TOK).unwrap()
}

pub fn set_reward_per_block(env: &Env, rate: i128) {
    env.storage().instance().set(&REWARD_PER_BLOCK, &rate);
}

pub fn get_reward_per_block(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_PER_BLOCK).unwrap_or(0)
}

pub fn set_start_block(env: &Env, start: u32) {
    env.storage().instance().set(&START_BLOCK, &start);
}

pub fn get_start_block(env: &Env) -> u32 {
    env.storage().instance().get(&START_BLOCK).unwrap_or(0)
}

pub fn get_pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&POOL_COUNT, &count);
}

pub fn get_total_weight(env: &Env) -> u32 {
    env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, total: u32) {
    env.storage().instance().set(&TOTAL_WEIGHT, &total);
}

pub fn set_rewarder(env: &Env, rewarder: &Address) {
    env.storage().instance().set(&REWARDER, rewarder);
}

pub fn get_rewarder(env: &Env) -> Option<Address> {
    env.storage().instance().get(&REWARDER)
}

// ── Pool records ────────────────────────────────────────────────────────────

fn pool_key(pool_id: u32) -> (Symbol, u32) {
    (POOL, pool_id)
}

pub fn get_pool(env: &Env, pool_id: u32) -> Option<Pool> {
    let key = pool_key(pool_id);
    let pool: Option<Pool> = env.storage().persistent().get(&key);
    if pool.is_some() {
        extend_ttl(env, &key);
    }
    pool
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &Pool) {
    let key = pool_key(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_ttl(env, &key);
}

/// Returns the pool id a staking asset is bound to, if any.
pub fn get_pool_id_for_asset(env: &Env, asset: &Address) -> Option<u32> {
    let key = (ASSET, asset.clone());
    let pool_id: Option<u32> = env.storage().persistent().get(&key);
    if pool_id.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    pool_id
}

pub fn bind_asset(env: &Env, asset: &Address, pool_id: u32) {
    let key = (ASSET, asset.clone());
    env.storage().persistent().set(&key, &pool_id);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── User positions ──────────────────────────────────────────────────────────

fn position_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (USER, pool_id, user.clone())
}

/// Fetch a position, defaulting to an empty one for first-time depositors.
pub fn get_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    let key = position_key(pool_id, user);
    let position: Option<UserPosition> = env.storage().persistent().get(&key);
    match position {
        Some(p) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            p
        }
        None => UserPosition::zero(),
    }
}

pub fn set_position(env: &Env, pool_id: u32, user: &Address, position: &UserPosition) {
    let key = position_key(pool_id, user);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl(env: &Env, key: &(Symbol, u32)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
