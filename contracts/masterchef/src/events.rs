use soroban_sdk::{contracttype, symbol_short, Address, Env};

// Event payload structs. Topics carry the acting user so indexers can filter
// per-account activity without decoding payloads.

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
    pub start_block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub staking_asset: Address,
    pub weight: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pool_id: u32,
    pub weight: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewarderSetEvent {
    pub rewarder: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    reward_per_block: i128,
    start_block: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            reward_per_block,
            start_block,
        },
    );
}

pub fn publish_pool_added(env: &Env, pool_id: u32, staking_asset: Address, weight: u32) {
    env.events().publish(
        (symbol_short!("POOL_ADD"),),
        PoolAddedEvent {
            pool_id,
            staking_asset,
            weight,
        },
    );
}

pub fn publish_pool_weight_set(env: &Env, pool_id: u32, weight: u32) {
    env.events().publish(
        (symbol_short!("POOL_SET"),),
        PoolWeightSetEvent { pool_id, weight },
    );
}

pub fn publish_rewarder_set(env: &Env, rewarder: Address) {
    env.events().publish(
        (symbol_short!("RWD_SET"),),
        RewarderSetEvent { rewarder },
    );
}

pub fn publish_deposit(env: &Env, user: Address, pool_id: u32, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositEvent {
            user,
            pool_id,
            amount,
            recipient,
        },
    );
}

pub fn publish_withdraw(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn publish_harvest(env: &Env, user: Address, pool_id: u32, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("HARVEST"), user.clone()),
        HarvestEvent {
            user,
            pool_id,
            amount,
            recipient,
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    user: Address,
    pool_id: u32,
    amount: i128,
    recipient: Address,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), user.clone()),
        EmergencyWithdrawEvent {
            user,
            pool_id,
            amount,
            recipient,
        },
    );
}
