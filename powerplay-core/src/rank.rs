//! PowerPlay rank brackets.
//!
//! Ranks 1 through 5 have hand-sized brackets; every rank from 6 upward spans a
//! flat 8,000 merits.

use crate::constants::{RANK_DELTAS, RANK_STEP_MERITS, RANK_THRESHOLDS};

/// Rank held at a cumulative merit total.
#[must_use]
pub fn rank(total_merits: u64) -> u32 {
    if let Some(idx) = RANK_THRESHOLDS
        .iter()
        .position(|threshold| total_merits < *threshold)
    {
        return u32::try_from(idx).unwrap_or(0) + 1;
    }
    let last = RANK_THRESHOLDS[RANK_THRESHOLDS.len() - 1];
    let steps = (total_merits - last) / RANK_STEP_MERITS;
    u32::try_from(steps).unwrap_or(u32::MAX - 6).saturating_add(6)
}

/// Lowest cumulative merit total that still holds `rank`.
#[must_use]
pub fn rank_lower_bound(rank: u32) -> u64 {
    match rank {
        0 | 1 => 0,
        2..=5 => RANK_THRESHOLDS[(rank - 2) as usize],
        _ => RANK_THRESHOLDS[3] + RANK_STEP_MERITS * u64::from(rank - 5),
    }
}

/// Merits separating `rank` from the next rank.
#[must_use]
pub fn next_rank_delta(rank: u32) -> u64 {
    match rank {
        1..=4 => RANK_DELTAS[(rank - 1) as usize],
        _ => RANK_STEP_MERITS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_brackets() {
        assert_eq!(rank(0), 1);
        assert_eq!(rank(1_999), 1);
        assert_eq!(rank(2_000), 2);
        assert_eq!(rank(4_999), 2);
        assert_eq!(rank(5_000), 3);
        assert_eq!(rank(9_000), 4);
        assert_eq!(rank(15_000), 5);
        assert_eq!(rank(22_999), 5);
        assert_eq!(rank(23_000), 6);
        assert_eq!(rank(30_999), 6);
        assert_eq!(rank(31_000), 7);
    }

    #[test]
    fn veteran_rank_from_journal_total() {
        assert_eq!(rank(1_168_157), 149);
        assert!(rank_lower_bound(149) <= 1_168_157);
        assert!(rank_lower_bound(150) > 1_168_157);
    }

    #[test]
    fn lower_bounds_and_deltas_line_up() {
        assert_eq!(rank_lower_bound(0), 0);
        assert_eq!(rank_lower_bound(1), 0);
        assert_eq!(rank_lower_bound(2), 2_000);
        assert_eq!(rank_lower_bound(3), 5_000);
        assert_eq!(rank_lower_bound(4), 9_000);
        assert_eq!(rank_lower_bound(5), 15_000);
        assert_eq!(rank_lower_bound(6), 23_000);
        for r in 1..40 {
            assert_eq!(rank_lower_bound(r) + next_rank_delta(r), rank_lower_bound(r + 1));
        }
    }

    #[test]
    fn monotonic_and_bounded() {
        let mut previous = rank(0);
        for merits in (0..200_000).step_by(250) {
            let current = rank(merits);
            assert!(current >= previous);
            assert!(rank_lower_bound(current) <= merits);
            previous = current;
        }
    }
}
