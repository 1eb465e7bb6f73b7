use soroban_sdk::{contractclient, Address, Env};

/// Hook interface for a secondary-reward collaborator.
///
/// The engine notifies the registered rewarder after every balance-changing
/// operation, once all of its own state is final. Implementations may pay
/// out a second reward asset for the same staking event. The engine invokes
/// the hook through its `try_` client so a faulting implementation can never
/// revert the primary operation.
#[contractclient(name = "RewarderClient")]
pub trait RewarderBridge {
    /// Called with the user's post-operation staked amount in `pool_id`.
    fn on_stake_changed(env: Env, user: Address, pool_id: u32, new_staked_amount: i128);
}
