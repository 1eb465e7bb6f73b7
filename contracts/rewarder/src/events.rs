use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub chef: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusPaidEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateSetEvent {
    pub reward_per_block: i128,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    chef: Address,
    reward_token: Address,
    reward_per_block: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            chef,
            reward_token,
            reward_per_block,
        },
    );
}

pub fn publish_bonus_paid(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("BONUS"), user.clone()),
        BonusPaidEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn publish_rate_set(env: &Env, reward_per_block: i128) {
    env.events()
        .publish((symbol_short!("RATE_SET"),), RateSetEvent { reward_per_block });
}
