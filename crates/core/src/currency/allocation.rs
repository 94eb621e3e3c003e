//! Amount allocation utilities using Largest Remainder Method.
//!
//! Allocations work on integer minor units (cents), so the parts always sum
//! to exactly the original total.
//!
//! The Largest Remainder Method works by:
//! 1. Calculate exact allocations
//! 2. Round down each allocation
//! 3. Calculate the remainder (total - sum of rounded)
//! 4. Distribute remainder units to items with largest fractional parts

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Allocation utility for distributing amounts.
///
/// Uses the Largest Remainder Method to ensure:
/// - Fair distribution of amounts
/// - Sum of allocations EXACTLY equals the original total
/// - No cents are lost or gained
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocate cents equally across N recipients.
    ///
    /// Earlier recipients receive the leftover cents.
    ///
    /// # Example
    ///
    /// ```
    /// use tripsplit_core::currency::AllocationUtil;
    ///
    /// // 100.00 / 3 = [33.34, 33.33, 33.33]
    /// let result = AllocationUtil::allocate_equal(10_000, 3);
    /// assert_eq!(result, vec![3_334, 3_333, 3_333]);
    /// ```
    #[must_use]
    pub fn allocate_equal(total_cents: i64, count: usize) -> Vec<i64> {
        Self::allocate_by_weights(total_cents, &vec![Decimal::ONE; count])
    }

    /// Allocate cents proportionally to `weights`.
    ///
    /// Weights need not sum to anything in particular. If they sum to zero
    /// (or less) every recipient gets zero. Ties between equal fractional
    /// parts go to the earlier recipient. Negative totals are allocated on
    /// their magnitude and the sign is applied afterwards.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tripsplit_core::currency::AllocationUtil;
    ///
    /// // 100.00 split 2:1
    /// let result = AllocationUtil::allocate_by_weights(10_000, &[dec!(2), dec!(1)]);
    /// assert_eq!(result, vec![6_667, 3_333]);
    /// ```
    #[must_use]
    pub fn allocate_by_weights(total_cents: i64, weights: &[Decimal]) -> Vec<i64> {
        if weights.is_empty() {
            return vec![];
        }

        let weight_sum: Decimal = weights
            .iter()
            .fold(Decimal::ZERO, |acc, w| acc.saturating_add(*w));
        if weight_sum <= Decimal::ZERO {
            return vec![0; weights.len()];
        }

        let sign = total_cents.signum();
        let magnitude = Decimal::from(total_cents.unsigned_abs());

        // Exact allocations in cents
        let exact: Vec<Decimal> = weights
            .iter()
            .map(|w| magnitude.saturating_mul(*w) / weight_sum)
            .collect();

        // Round down each
        let mut rounded: Vec<i64> = exact
            .iter()
            .map(|a| a.trunc().to_i64().unwrap_or(0))
            .collect();

        // Remainder to distribute
        let sum_rounded: i64 = rounded.iter().sum();
        let remainder = i64::try_from(total_cents.unsigned_abs())
            .unwrap_or(i64::MAX)
            .saturating_sub(sum_rounded);
        let units_to_distribute = usize::try_from(remainder).unwrap_or(0);

        if units_to_distribute > 0 {
            // Fractional remainder of each allocation
            let mut remainders: Vec<(usize, Decimal)> = exact
                .iter()
                .map(|e| e.fract())
                .enumerate()
                .collect();

            // Largest first; stable sort keeps earlier recipients ahead on ties
            remainders.sort_by(|a, b| b.1.cmp(&a.1));

            for (idx, _) in remainders.iter().take(units_to_distribute) {
                rounded[*idx] += 1;
            }
        }

        rounded.into_iter().map(|c| c * sign).collect()
    }
}
