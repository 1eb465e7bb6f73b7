/// Fixed-point scaling factor.
///
/// All accumulated reward-per-share values are multiplied by this constant
/// before storage to preserve sub-unit precision without floating-point
/// arithmetic. Using 10^12 gives 12 decimal places of precision, which is
/// more than sufficient for per-block emissions spread over staked supplies
/// up to 10^26 units without truncating to zero.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Scaling primitives ──────────────────────────────────────────────────────

/// Scale an amount up into accumulator units: `x × PRECISION`.
///
/// Returns `None` on overflow. Every caller must treat `None` as a fatal
/// arithmetic error for the enclosing operation; the value must never be
/// clamped or wrapped, since a silently corrupted accumulator poisons all
/// downstream accounting.
pub fn scale_up(x: i128) -> Option<i128> {
    x.checked_mul(PRECISION)
}

/// Scale an accumulator-unit value back down into token units.
///
/// Integer division, truncating toward zero. Truncation here is the only
/// place precision is lost, and it always rounds in the engine's favor.
pub fn scale_down(x: i128) -> i128 {
    x / PRECISION
}

// ── Reward schedule ─────────────────────────────────────────────────────────

/// Number of reward-eligible blocks in the half-open range `(from, to]`.
///
/// ```text
/// multiplier = max(0, to − max(from, start))
/// ```
///
/// Blocks before `start` never accrue; a `to` at or before `start` yields
/// zero.
pub fn multiplier(from: u32, to: u32, start: u32) -> u64 {
    u64::from(to.saturating_sub(from.max(start)))
}

/// Reward emitted to one pool over `multiplier` blocks.
///
/// ```text
/// reward = multiplier × reward_per_block × weight / total_weight
/// ```
///
/// A zero `total_weight` means no pool is eligible for emissions, so the
/// reward is zero rather than a division error.
pub fn block_reward(
    multiplier: u64,
    reward_per_block: i128,
    weight: u32,
    total_weight: u32,
) -> Option<i128> {
    if total_weight == 0 {
        return Some(0);
    }
    (multiplier as i128)
        .checked_mul(reward_per_block)?
        .checked_mul(i128::from(weight))
        .map(|r| r / i128::from(total_weight))
}

// ── Accumulator ─────────────────────────────────────────────────────────────

/// Advance a pool accumulator by `reward` tokens spread over `supply` staked
/// units.
///
/// ```text
/// new_acc = acc + reward × PRECISION / supply
/// ```
///
/// When `supply` is zero the accumulator is returned unchanged — no stakers
/// means no distribution, and the reward for that interval is forfeited
/// rather than carried forward.
pub fn accrue_per_share(acc: i128, reward: i128, supply: i128) -> Option<i128> {
    if supply <= 0 {
        return Some(acc);
    }
    let delta = scale_up(reward)? / supply;
    acc.checked_add(delta)
}

/// Reward-debt snapshot for a position of `staked` units at accumulator
/// `acc`: the reward already accounted for, so it is never paid twice.
pub fn reward_debt(staked: i128, acc: i128) -> Option<i128> {
    staked.checked_mul(acc).map(scale_down)
}

/// Newly earned reward for a position since its last debt snapshot.
///
/// ```text
/// pending = staked × acc / PRECISION − debt
/// ```
///
/// At any quiescent point this is ≥ 0, because the accumulator is
/// monotonically non-decreasing and `debt` was taken at an earlier (or
/// equal) accumulator value.
pub fn pending(staked: i128, acc: i128, debt: i128) -> Option<i128> {
    staked
        .checked_mul(acc)
        .map(scale_down)?
        .checked_sub(debt)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn multiplier_counts_elapsed_blocks() {
        assert_eq!(multiplier(100, 103, 0), 3);
        assert_eq!(multiplier(100, 100, 0), 0);
    }

    #[test]
    fn multiplier_gates_on_start_block() {
        // Nothing accrues before the start block.
        assert_eq!(multiplier(10, 40, 50), 0);
        // A range straddling the start only counts the tail.
        assert_eq!(multiplier(10, 60, 50), 10);
        // Past the start, the gate is inert.
        assert_eq!(multiplier(60, 70, 50), 10);
    }

    #[test]
    fn block_reward_is_weight_proportional() {
        // 3 blocks × 1e18 per block, pool holds 5000 of 20000 weight.
        let r = block_reward(3, 1_000_000_000_000_000_000, 5_000, 20_000).unwrap();
        assert_eq!(r, 750_000_000_000_000_000);
    }

    #[test]
    fn block_reward_zero_total_weight() {
        assert_eq!(block_reward(10, 1_000, 0, 0), Some(0));
    }

    #[test]
    fn accrue_unchanged_when_no_stakers() {
        assert_eq!(accrue_per_share(500, 1_000, 0), Some(500));
    }

    #[test]
    fn accrue_adds_scaled_delta() {
        // reward=1000 over supply=1000 → +1 token per share, scaled.
        assert_eq!(accrue_per_share(0, 1_000, 1_000), Some(PRECISION));
    }

    #[test]
    fn pending_zero_right_after_debt_snapshot() {
        let acc = 7 * PRECISION;
        let debt = reward_debt(1_000, acc).unwrap();
        assert_eq!(pending(1_000, acc, debt), Some(0));
    }

    #[test]
    fn pending_matches_boundary_scenario() {
        // Sole pool, weight 5000, 1e18 per block, 1000 staked, 3 blocks.
        let rpb: i128 = 1_000_000_000_000_000_000;
        let reward = block_reward(3, rpb, 5_000, 5_000).unwrap();
        let acc = accrue_per_share(0, reward, 1_000).unwrap();
        assert_eq!(pending(1_000, acc, 0), Some(3 * rpb));
    }

    #[test]
    fn scale_up_detects_overflow() {
        assert_eq!(scale_up(i128::MAX / 2), None);
    }

    proptest! {
        /// The accumulator never decreases.
        #[test]
        fn accumulator_monotonic(
            acc in 0i128..=1i128 << 100,
            reward in 0i128..=1i128 << 80,
            supply in 0i128..=1i128 << 80,
        ) {
            if let Some(next) = accrue_per_share(acc, reward, supply) {
                prop_assert!(next >= acc);
            }
        }

        /// A debt snapshot taken at an earlier accumulator value never
        /// produces negative pending at a later one.
        #[test]
        fn pending_never_negative(
            staked in 0i128..=1i128 << 60,
            acc_before in 0i128..=1i128 << 60,
            acc_delta in 0i128..=1i128 << 60,
        ) {
            let debt = reward_debt(staked, acc_before).unwrap();
            let acc_after = acc_before + acc_delta;
            let p = pending(staked, acc_after, debt).unwrap();
            prop_assert!(p >= 0);
        }

        /// Truncation loses strictly less than one token unit per position.
        #[test]
        fn truncation_bounded(
            staked in 1i128..=1i128 << 60,
            acc_before in 0i128..=1i128 << 50,
            acc_delta in 0i128..=1i128 << 50,
        ) {
            let debt = reward_debt(staked, acc_before).unwrap();
            let p = pending(staked, acc_before + acc_delta, debt).unwrap();
            let exact_num = staked * acc_delta; // still scaled by PRECISION
            // One truncation on each side of the subtraction, so the paid
            // amount differs from the exact share by under one token unit.
            prop_assert!((scale_up(p).unwrap() - exact_num).abs() < PRECISION);
        }
    }
}
