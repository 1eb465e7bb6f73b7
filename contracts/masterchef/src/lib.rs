#![no_std]

pub mod events;
pub mod storage;


use common::bridge::RewarderClient;
use common::math;
use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env};
use storage::{Pool, UserPosition};

/// Contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    /// Referenced pool index does not exist.
    PoolNotFound = 4,
    /// The staking asset is already bound to an existing pool.
    DuplicateAsset = 5,
    /// Withdrawal amount exceeds the staked amount.
    InsufficientBalance = 6,
    /// An intermediate computation would exceed i128; fatal, never wrapped.
    ArithmeticOverflow = 7,
    InvalidAmount = 8,
}

#[contract]
pub struct MasterChef;

/// Pro-rata reward distributor over weighted staking pools.
///
/// A fixed per-ledger reward budget is split across pools by allocation
/// weight and, within a pool, by each depositor's share of the staked
/// balance. Accounting is O(1) per call via a scaled accumulator: each pool
/// tracks cumulative reward-per-staked-unit, and each position snapshots a
/// reward debt at every balance change.
///
/// All internal state is committed before any token transfer or rewarder
/// invocation, so no external collaborator can re-enter and observe a
/// half-updated pool.
#[contractimpl]
impl MasterChef {
    /// Configure the engine. `reward_per_block` is constant afterwards;
    /// `start_block` is the ledger sequence before which nothing accrues.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        reward_per_block: i128,
        start_block: u32,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            return Err(Error::InvalidAmount);
        }

        storage::set_admin(&env, &admin);
        storage::set_reward_token(&env, &reward_token);
        storage::set_reward_per_block(&env, reward_per_block);
        storage::set_start_block(&env, start_block);
        storage::set_initialized(&env);

        events::publish_initialized(&env, admin, reward_token, reward_per_block, start_block);

        Ok(())
    }

    /// Register a new pool for `staking_asset` with the given allocation
    /// weight. Admin only. Each asset may back at most one pool.
    pub fn add_pool(
        env: Env,
        caller: Address,
        weight: u32,
        staking_asset: Address,
    ) -> Result<u32, Error> {
        require_admin(&env, &caller)?;

        if storage::get_pool_id_for_asset(&env, &staking_asset).is_some() {
            return Err(Error::DuplicateAsset);
        }

        let total = storage::get_total_weight(&env)
            .checked_add(weight)
            .ok_or(Error::ArithmeticOverflow)?;

        let pool_id = storage::get_pool_count(&env);
        let pool = Pool {
            staking_asset: staking_asset.clone(),
            weight,
            acc_reward_per_share: 0,
            last_reward_block: env.ledger().sequence(),
            total_staked: 0,
        };

        storage::set_pool(&env, pool_id, &pool);
        storage::bind_asset(&env, &staking_asset, pool_id);
        storage::set_pool_count(&env, pool_id + 1);
        storage::set_total_weight(&env, total);

        events::publish_pool_added(&env, pool_id, staking_asset, weight);

        Ok(pool_id)
    }

    /// Change a pool's allocation weight. Admin only.
    ///
    /// The pool's accumulator is advanced first so the weight change only
    /// applies to blocks from here on; setting weight zero stops new
    /// emissions without disturbing already-credited history.
    pub fn set_pool_weight(
        env: Env,
        caller: Address,
        pool_id: u32,
        new_weight: u32,
    ) -> Result<(), Error> {
        require_admin(&env, &caller)?;

        let mut pool = advance_pool(&env, pool_id)?;

        let total = storage::get_total_weight(&env)
            .checked_sub(pool.weight)
            .and_then(|t| t.checked_add(new_weight))
            .ok_or(Error::ArithmeticOverflow)?;

        pool.weight = new_weight;
        storage::set_pool(&env, pool_id, &pool);
        storage::set_total_weight(&env, total);

        events::publish_pool_weight_set(&env, pool_id, new_weight);

        Ok(())
    }

    /// Register the secondary-reward collaborator. Admin only.
    pub fn set_rewarder(env: Env, caller: Address, rewarder: Address) -> Result<(), Error> {
        require_admin(&env, &caller)?;

        storage::set_rewarder(&env, &rewarder);
        events::publish_rewarder_set(&env, rewarder);

        Ok(())
    }

    /// Advance a pool's accumulator to the current ledger. Open to anyone;
    /// a second call in the same ledger is a no-op.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<Pool, Error> {
        advance_pool(&env, pool_id)
    }

    /// Read-only projection of what a harvesting operation in this ledger
    /// would pay `user` from `pool_id`.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, Error> {
        let pool = storage::get_pool(&env, pool_id).ok_or(Error::PoolNotFound)?;
        let position = storage::get_position(&env, pool_id, &user);
        if position.amount <= 0 {
            return Ok(0);
        }
        let acc = projected_acc(&env, &pool)?;
        math::pending(position.amount, acc, position.reward_debt).ok_or(Error::ArithmeticOverflow)
    }

    /// Stake `amount` of the pool's asset for `from`, paying any reward
    /// already earned to `recipient` before the balance changes.
    pub fn deposit(
        env: Env,
        from: Address,
        pool_id: u32,
        amount: i128,
        recipient: Address,
    ) -> Result<(), Error> {
        from.require_auth();
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut pool = advance_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &from);

        // Settle prior entitlement before the balance changes.
        let pending = settled_pending(&pool, &position)?;

        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        position.reward_debt = math::reward_debt(position.amount, pool.acc_reward_per_share)
            .ok_or(Error::ArithmeticOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &from, &position);

        // External interactions only after all internal state is final.
        token::Client::new(&env, &pool.staking_asset).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        pay_reward(&env, &recipient, pending);
        notify_rewarder(&env, &from, pool_id, position.amount);

        events::publish_deposit(&env, from, pool_id, amount, recipient);

        Ok(())
    }

    /// Unstake `amount`, harvesting earned reward to `from` along the way.
    pub fn withdraw(env: Env, from: Address, pool_id: u32, amount: i128) -> Result<(), Error> {
        from.require_auth();
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut pool = advance_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &from);

        if amount > position.amount {
            return Err(Error::InsufficientBalance);
        }

        let pending = settled_pending(&pool, &position)?;

        position.amount -= amount;
        position.reward_debt = math::reward_debt(position.amount, pool.acc_reward_per_share)
            .ok_or(Error::ArithmeticOverflow)?;
        pool.total_staked -= amount;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &from, &position);

        token::Client::new(&env, &pool.staking_asset).transfer(
            &env.current_contract_address(),
            &from,
            &amount,
        );
        pay_reward(&env, &from, pending);
        notify_rewarder(&env, &from, pool_id, position.amount);

        events::publish_withdraw(&env, from, pool_id, amount);

        Ok(())
    }

    /// Pay out earned reward to `recipient` without touching the stake.
    pub fn harvest(env: Env, from: Address, pool_id: u32, recipient: Address) -> Result<i128, Error> {
        from.require_auth();

        let pool = advance_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &from);

        let pending = settled_pending(&pool, &position)?;

        position.reward_debt = math::reward_debt(position.amount, pool.acc_reward_per_share)
            .ok_or(Error::ArithmeticOverflow)?;
        storage::set_position(&env, pool_id, &from, &position);

        pay_reward(&env, &recipient, pending);
        notify_rewarder(&env, &from, pool_id, position.amount);

        events::publish_harvest(&env, from, pool_id, pending, recipient);

        Ok(pending)
    }

    /// Bypass valve: return the full staked principal to `recipient`,
    /// deliberately forfeiting any unclaimed reward.
    ///
    /// Skips the accumulator entirely and never touches the reward token,
    /// so it succeeds even when the reward payout path is broken.
    pub fn emergency_withdraw(
        env: Env,
        from: Address,
        pool_id: u32,
        recipient: Address,
    ) -> Result<(), Error> {
        from.require_auth();

        let mut pool = storage::get_pool(&env, pool_id).ok_or(Error::PoolNotFound)?;
        let position = storage::get_position(&env, pool_id, &from);
        let amount = position.amount;

        pool.total_staked -= amount;
        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &from, &UserPosition::zero());

        if amount > 0 {
            token::Client::new(&env, &pool.staking_asset).transfer(
                &env.current_contract_address(),
                &recipient,
                &amount,
            );
        }
        notify_rewarder(&env, &from, pool_id, 0);

        events::publish_emergency_withdraw(&env, from, pool_id, amount, recipient);

        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Number of registered pools.
    pub fn pool_length(env: Env) -> u32 {
        storage::get_pool_count(&env)
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, Error> {
        storage::get_pool(&env, pool_id).ok_or(Error::PoolNotFound)
    }

    /// A user's position in a pool; zero for addresses that never deposited.
    pub fn get_position(env: Env, pool_id: u32, user: Address) -> UserPosition {
        storage::get_position(&env, pool_id, &user)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env).ok_or(Error::NotInitialized)
    }

    pub fn get_rewarder(env: Env) -> Option<Address> {
        storage::get_rewarder(&env)
    }

    pub fn get_reward_per_block(env: Env) -> i128 {
        storage::get_reward_per_block(&env)
    }

    pub fn get_total_weight(env: Env) -> u32 {
        storage::get_total_weight(&env)
    }

    pub fn get_start_block(env: Env) -> u32 {
        storage::get_start_block(&env)
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let admin = storage::get_admin(env).ok_or(Error::NotInitialized)?;
    if *caller != admin {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Advance the pool accumulator to the current ledger and persist it.
///
/// Gated on `last_reward_block` so repeated calls within one ledger accrue
/// exactly once. With nothing staked only the block marker moves; the
/// reward for that interval is forfeited, never carried forward.
fn advance_pool(env: &Env, pool_id: u32) -> Result<Pool, Error> {
    let mut pool = storage::get_pool(env, pool_id).ok_or(Error::PoolNotFound)?;
    let current = env.ledger().sequence();

    if current <= pool.last_reward_block {
        return Ok(pool);
    }

    if pool.total_staked > 0 {
        pool.acc_reward_per_share = projected_acc(env, &pool)?;
    }
    pool.last_reward_block = current;
    storage::set_pool(env, pool_id, &pool);

    Ok(pool)
}

/// Simulate the accumulator value at the current ledger without writing.
fn projected_acc(env: &Env, pool: &Pool) -> Result<i128, Error> {
    let current = env.ledger().sequence();
    if current <= pool.last_reward_block || pool.total_staked <= 0 {
        return Ok(pool.acc_reward_per_share);
    }

    let elapsed = math::multiplier(
        pool.last_reward_block,
        current,
        storage::get_start_block(env),
    );
    let reward = math::block_reward(
        elapsed,
        storage::get_reward_per_block(env),
        pool.weight,
        storage::get_total_weight(env),
    )
    .ok_or(Error::ArithmeticOverflow)?;

    math::accrue_per_share(pool.acc_reward_per_share, reward, pool.total_staked)
        .ok_or(Error::ArithmeticOverflow)
}

/// Reward newly earned by `position` against the already-advanced `pool`.
fn settled_pending(pool: &Pool, position: &UserPosition) -> Result<i128, Error> {
    if position.amount <= 0 {
        return Ok(0);
    }
    math::pending(
        position.amount,
        pool.acc_reward_per_share,
        position.reward_debt,
    )
    .ok_or(Error::ArithmeticOverflow)
}

/// Transfer `amount` of the reward token out of the engine's balance.
///
/// An insolvent reward balance traps in the token contract, failing the
/// whole enclosing operation with no partial payout.
fn pay_reward(env: &Env, recipient: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, &storage::get_reward_token(env)).transfer(
            &env.current_contract_address(),
            recipient,
            &amount,
        );
    }
}

/// Fire-and-forget notification to the registered rewarder, if any.
///
/// Invoked last, with all engine state final. The `try_` call absorbs any
/// fault in the collaborator so it cannot revert the primary operation.
fn notify_rewarder(env: &Env, user: &Address, pool_id: u32, new_staked_amount: i128) {
    if let Some(rewarder) = storage::get_rewarder(env) {
        let client = RewarderClient::new(env, &rewarder);
        let _ = client.try_on_stake_changed(user, &pool_id, &new_staked_amount);
    }
}
