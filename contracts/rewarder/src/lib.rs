#![no_std]

pub mod events;

#[cfg(test)]
mod test;

use common::bridge::RewarderBridge;
use common::math;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, token,
    Address, Env, Symbol,
};

// ── Storage keys ────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
/// The engine allowed to report stake changes.
const CHEF: Symbol = symbol_short!("CHEF");
const REWARD_TOK: Symbol = symbol_short!("RWD_TOK");
const REWARD_PER_BLOCK: Symbol = symbol_short!("RPB");

const POOL: Symbol = symbol_short!("POOL");
const USER: Symbol = symbol_short!("USER");

const TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

// ── Types ───────────────────────────────────────────────────────────────────

/// Secondary accumulator state for one engine pool.
///
/// The rewarder keeps its own books from the staked amounts the engine
/// reports; it never reads the engine's storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusPool {
    pub acc_reward_per_share: i128,
    pub last_reward_block: u32,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusPosition {
    pub amount: i128,
    pub reward_debt: i128,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ArithmeticOverflow = 4,
    InvalidAmount = 5,
}

#[contract]
pub struct RewarderContract;

/// Secondary-reward collaborator for the MasterChef engine.
///
/// Emits a second reward asset at its own per-ledger rate to each pool the
/// engine reports stake changes for. Every pool accrues independently at the
/// full rate; weighting across pools stays the engine's concern.
#[contractimpl]
impl RewarderContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        chef: Address,
        reward_token: Address,
        reward_per_block: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(Error::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&CHEF, &chef);
        env.storage().instance().set(&REWARD_TOK, &reward_token);
        env.storage().instance().set(&REWARD_PER_BLOCK, &reward_per_block);
        env.storage().instance().set(&INITIALIZED, &true);

        events::publish_initialized(&env, admin, chef, reward_token, reward_per_block);

        Ok(())
    }

    /// Change the secondary emission rate. Admin only.
    pub fn set_reward_per_block(env: Env, caller: Address, rate: i128) -> Result<(), Error> {
        caller.require_auth();
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)?;
        if caller != admin {
            return Err(Error::Unauthorized);
        }
        if rate < 0 {
            return Err(Error::InvalidAmount);
        }

        // Settle nothing here; each pool advances lazily on its next report.
        env.storage().instance().set(&REWARD_PER_BLOCK, &rate);
        events::publish_rate_set(&env, rate);

        Ok(())
    }

    /// Secondary reward a user could harvest from `pool_id` right now.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> i128 {
        let pool = get_pool(&env, pool_id);
        let position = get_position(&env, pool_id, &user);
        if position.amount <= 0 {
            return 0;
        }
        let acc = projected_acc(&env, &pool);
        math::pending(position.amount, acc, position.reward_debt).unwrap_or(0)
    }

    pub fn get_chef(env: Env) -> Result<Address, Error> {
        env.storage().instance().get(&CHEF).ok_or(Error::NotInitialized)
    }

    pub fn get_reward_per_block(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_PER_BLOCK).unwrap_or(0)
    }
}

#[contractimpl]
impl RewarderBridge for RewarderContract {
    /// Settle and pay the user's accrued secondary reward, then adopt the
    /// reported staked amount as their new balance.
    ///
    /// Only the registered engine may call this; the engine's contract
    /// address authenticates implicitly when it invokes us directly. Any
    /// fault here (including an unfunded reward balance) traps and is
    /// absorbed by the engine's `try_` call.
    fn on_stake_changed(env: Env, user: Address, pool_id: u32, new_staked_amount: i128) {
        let chef: Address = match env.storage().instance().get(&CHEF) {
            Some(chef) => chef,
            None => panic_with_error!(&env, Error::NotInitialized),
        };
        chef.require_auth();

        if new_staked_amount < 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        let mut pool = get_pool(&env, pool_id);
        pool.acc_reward_per_share = projected_acc(&env, &pool);
        pool.last_reward_block = env.ledger().sequence();

        let mut position = get_position(&env, pool_id, &user);
        let pending = if position.amount > 0 {
            match math::pending(position.amount, pool.acc_reward_per_share, position.reward_debt) {
                Some(p) => p,
                None => panic_with_error!(&env, Error::ArithmeticOverflow),
            }
        } else {
            0
        };

        pool.total_staked = match pool
            .total_staked
            .checked_sub(position.amount)
            .and_then(|t| t.checked_add(new_staked_amount))
        {
            Some(t) => t,
            None => panic_with_error!(&env, Error::ArithmeticOverflow),
        };
        position.amount = new_staked_amount;
        position.reward_debt =
            match math::reward_debt(new_staked_amount, pool.acc_reward_per_share) {
                Some(d) => d,
                None => panic_with_error!(&env, Error::ArithmeticOverflow),
            };

        set_pool(&env, pool_id, &pool);
        set_position(&env, pool_id, &user, &position);

        if pending > 0 {
            let reward_token: Address = env.storage().instance().get(&REWARD_TOK).unwrap();
            token::Client::new(&env, &reward_token).transfer(
                &env.current_contract_address(),
                &user,
                &pending,
            );
        }

        events::publish_bonus_paid(&env, user, pool_id, pending);
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn get_pool(env: &Env, pool_id: u32) -> BonusPool {
    let key = (POOL, pool_id);
    match env.storage().persistent().get(&key) {
        Some(pool) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            pool
        }
        // First report for this pool starts a fresh accumulator.
        None => BonusPool {
            acc_reward_per_share: 0,
            last_reward_block: env.ledger().sequence(),
            total_staked: 0,
        },
    }
}

fn set_pool(env: &Env, pool_id: u32, pool: &BonusPool) {
    let key = (POOL, pool_id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn get_position(env: &Env, pool_id: u32, user: &Address) -> BonusPosition {
    env.storage()
        .persistent()
        .get(&(USER, pool_id, user.clone()))
        .unwrap_or(BonusPosition {
            amount: 0,
            reward_debt: 0,
        })
}

fn set_position(env: &Env, pool_id: u32, user: &Address, position: &BonusPosition) {
    let key = (USER, pool_id, user.clone());
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Accumulator value at the current ledger, without writing.
fn projected_acc(env: &Env, pool: &BonusPool) -> i128 {
    let current = env.ledger().sequence();
    if current <= pool.last_reward_block || pool.total_staked <= 0 {
        return pool.acc_reward_per_share;
    }

    let elapsed = math::multiplier(pool.last_reward_block, current, 0);
    let rate: i128 = env.storage().instance().get(&REWARD_PER_BLOCK).unwrap_or(0);
    let reward = match math::block_reward(elapsed, rate, 1, 1) {
        Some(r) => r,
        None => panic_with_error!(env, Error::ArithmeticOverflow),
    };
    match math::accrue_per_share(pool.acc_reward_per_share, reward, pool.total_staked) {
        Some(acc) => acc,
        None => panic_with_error!(env, Error::ArithmeticOverflow),
    }
}
