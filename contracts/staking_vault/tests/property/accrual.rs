#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for reward accrual.
//!
//! Invariants tested:
//! - Rewards owed to users never exceed what the vault has accrued minus
//!   what it has paid, and the rounding gap stays bounded
//! - The global index and the accrued total never decrease, and a
//!   campaign restart never pulls the end time back
//! - A refresh at an unchanged timestamp is a no-op
//! - Nothing accrues while the pool is empty
//! - A full year at 10 % pays exactly a tenth of the stake

use proptest::prelude::*;

use crate::{Harness, Op, DAY, MAX_STAKE, USERS, WAD, YEAR};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// After any sequence of operations, Σ user rewards ≤ accrued − claimed,
    /// and each reconciliation loses less than one unit to rounding.
    #[test]
    fn prop_user_rewards_bounded_by_accrued(
        ops in prop::collection::vec(any::<Op>(), 1..24),
    ) {
        let h = Harness::with_campaign(DAY);

        for (step, op) in ops.iter().enumerate() {
            h.apply(op);

            let outstanding = h.client.get_income_state().outstanding();
            let owed = h.total_user_rewards();
            prop_assert!(owed <= outstanding, "owed {} > outstanding {}", owed, outstanding);

            // At most two accounts are reconciled per operation, plus one
            // open segment per user. Campaign restarts and early ends
            // reconcile nobody.
            let max_gap = 2 * (step as i128 + 1) + USERS as i128;
            prop_assert!(outstanding - owed <= max_gap);
        }
    }

    /// The index and accrued total only move forward, across campaign
    /// restarts and early ends included.
    #[test]
    fn prop_index_monotonic(
        ops in prop::collection::vec(any::<Op>(), 1..24),
    ) {
        let h = Harness::with_campaign(DAY);
        let mut last = h.client.get_income_state();
        let mut end_before = h.client.campaign_end_time();

        for op in &ops {
            h.apply(op);
            let state = h.client.get_income_state();
            prop_assert!(state.index >= last.index);
            prop_assert!(state.total_accrued >= last.total_accrued);
            prop_assert!(state.total_claimed >= last.total_claimed);
            prop_assert!(state.last_update >= last.last_update);
            if matches!(op, Op::StartCampaign { .. }) {
                prop_assert!(h.client.campaign_end_time() >= end_before);
            }
            end_before = h.client.campaign_end_time();
            last = state;
        }
    }

    /// Operations that do not advance time leave the index untouched.
    #[test]
    fn prop_refresh_idempotent_at_same_timestamp(
        amount in 1i128..=MAX_STAKE,
        elapsed in 1u64..=90 * DAY,
    ) {
        let h = Harness::with_campaign(DAY);
        h.stake(&h.users[0], amount);
        h.advance(elapsed);

        let before = h.client.get_income_state();
        h.stake(&h.users[1], 1);
        let first = h.client.get_income_state();
        h.stake(&h.users[2], 1);
        let second = h.client.get_income_state();

        prop_assert_eq!(before.index, first.index);
        prop_assert_eq!(first, second);
    }

    /// An empty pool accrues nothing, however long it sits.
    #[test]
    fn prop_no_accrual_without_stake(
        idle in 0u64..=YEAR,
        amount in 1i128..=MAX_STAKE,
    ) {
        let h = Harness::with_campaign(DAY);
        h.advance(idle);

        prop_assert_eq!(h.client.current_index(), 0);
        prop_assert_eq!(h.client.get_income_state().total_accrued, 0);

        if h.now() < YEAR {
            h.stake(&h.users[0], amount);
            prop_assert_eq!(h.client.total_reward_balance(&h.users[0]), 0);
        }
    }

    /// One year at 10 % yields floor(stake / 10), regardless of how often
    /// the index is refreshed along the way.
    #[test]
    fn prop_full_year_yield(
        amount in 1i128..=MAX_STAKE,
        checkpoints in prop::collection::vec(1u64..YEAR, 0..6),
    ) {
        let h = Harness::with_campaign(DAY);
        h.stake(&h.users[0], amount);

        // Refresh at arbitrary points; the index still lands on WAD / 10.
        let mut points = checkpoints.clone();
        points.sort_unstable();
        for at in points {
            let now = h.now();
            h.advance(at - now.min(at));
            h.stake(&h.users[1], 1);
            h.client.request_redeem(&h.users[1], &h.users[1], &1);
        }
        let now = h.now();
        h.advance(YEAR - now);

        prop_assert!(h.client.current_index() <= WAD / 10);
        let earned = h.client.total_reward_balance(&h.users[0]);
        prop_assert!(earned <= amount / 10);
        prop_assert!(amount / 10 - earned <= checkpoints.len() as i128 + 1);
    }
}
