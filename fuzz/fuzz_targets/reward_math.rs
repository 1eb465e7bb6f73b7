#![no_main]

use arbitrary::Arbitrary;
use common::math;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    acc: i128,
    reward_per_block: i128,
    weight: u32,
    total_weight: u32,
    supply: i128,
    staked: i128,
    from_block: u32,
    to_block: u32,
    start_block: u32,
}

// Drive the full accumulator pipeline with arbitrary inputs: nothing may
// panic, and on the happy path the accumulator must stay monotonic with a
// non-negative pending amount for a fresh debt snapshot.
fuzz_target!(|input: Input| {
    let elapsed = math::multiplier(input.from_block, input.to_block, input.start_block);

    let Some(reward) = math::block_reward(
        elapsed,
        input.reward_per_block,
        input.weight,
        input.total_weight,
    ) else {
        return;
    };

    let Some(acc) = math::accrue_per_share(input.acc, reward, input.supply) else {
        return;
    };
    if input.acc >= 0 && reward >= 0 {
        assert!(acc >= input.acc);
    }

    let Some(debt) = math::reward_debt(input.staked, acc) else {
        return;
    };
    if let Some(pending) = math::pending(input.staked, acc, debt) {
        // A debt snapshot taken at the same accumulator leaves nothing owed.
        assert_eq!(pending, 0);
    }
});
