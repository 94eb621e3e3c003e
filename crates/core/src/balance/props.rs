//! Property-based tests for balance computation.
//!
//! - Order independence under any permutation of expenses
//! - Zero-sum of unrounded and rounded balances
//! - Itemized shares sum to the rounded total

use proptest::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::{Currency, Money};

use super::breakdown::ExpenseBreakdown;
use super::calculator::BalanceCalculator;
use crate::trip::{Expense, Participant, Split, TripSnapshot};

/// Shape of a generated expense before participants exist.
///
/// Weights and custom shares are strictly positive: an expense whose shares
/// all weigh zero credits its payer without debiting anyone, which is not
/// zero-sum.
#[derive(Debug, Clone)]
struct ExpenseShape {
    payer: usize,
    cents: i64,
    fx_rate: Option<Decimal>,
    kind: u8,
    members: Vec<(usize, i64)>,
}

fn expense_shape() -> impl Strategy<Value = ExpenseShape> {
    (
        0usize..8,
        1i64..10_000_000,
        prop::option::of((1i64..50_000).prop_map(|v| Decimal::new(v, 4))),
        0u8..4,
        prop::collection::vec((0usize..8, 1i64..1_000), 0..6),
    )
        .prop_map(|(payer, cents, fx_rate, kind, members)| ExpenseShape {
            payer,
            cents,
            fx_rate,
            kind,
            members,
        })
}

fn trip() -> impl Strategy<Value = TripSnapshot> {
    (
        prop::collection::vec(1i64..500, 1..8),
        prop::collection::vec(expense_shape(), 0..15),
    )
        .prop_map(|(weights, shapes)| {
            let participants: Vec<Participant> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| Participant::new(format!("P{i}")).with_weight(Decimal::new(*w, 2)))
                .collect();
            let n = participants.len();
            let expenses = shapes
                .into_iter()
                .map(|shape| build_expense(&shape, &participants, n))
                .collect();
            TripSnapshot::new(Currency::USD, participants, expenses)
        })
}

fn trip_and_shuffled_expenses() -> impl Strategy<Value = (TripSnapshot, Vec<Expense>)> {
    trip().prop_flat_map(|snapshot| {
        let expenses = snapshot.expenses.clone();
        (Just(snapshot), Just(expenses).prop_shuffle())
    })
}

fn build_expense(shape: &ExpenseShape, participants: &[Participant], n: usize) -> Expense {
    let payer = participants[shape.payer % n].id;
    let splits = shape
        .members
        .iter()
        .map(|(idx, value)| {
            let id = participants[idx % n].id;
            match shape.kind {
                0 => Split::equal(id),
                1 => Split::weight(id),
                _ => Split::custom(id, Decimal::new(*value, 1)),
            }
        })
        .collect();
    let currency = if shape.fx_rate.is_some() { Currency::EUR } else { Currency::USD };
    let mut expense =
        Expense::new(payer, Money::new(Decimal::new(shape.cents, 2), currency)).with_splits(splits);
    expense.fx_rate_to_home = shape.fx_rate;
    expense
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* trip and any permutation of its expenses, no balance SHALL
    /// change by more than one cent.
    #[test]
    fn prop_order_independence((snapshot, shuffled) in trip_and_shuffled_expenses()) {
        let calculator = BalanceCalculator::default();
        let forward = calculator.compute(&snapshot);
        prop_assert!(forward.is_ok());

        let mut permuted = snapshot.clone();
        permuted.expenses = shuffled;
        let other = calculator.compute(&permuted);
        prop_assert!(other.is_ok());

        let other = other.unwrap_or_default().to_map();
        for (id, amount) in forward.unwrap_or_default().iter() {
            let moved = other.get(&id).copied().unwrap_or_default();
            prop_assert!((amount - moved).abs() <= Decimal::new(1, 2));
        }
    }

    /// *For any* trip, the unrounded total SHALL be within 1e-6 of zero and
    /// the rounded total within half a cent per participant.
    #[test]
    fn prop_zero_sum(snapshot in trip()) {
        let balances = BalanceCalculator::default().compute(&snapshot);
        prop_assert!(balances.is_ok());
        let balances = balances.unwrap_or_default();

        prop_assert!(
            balances.unrounded_total().abs() <= Decimal::new(1, 6),
            "Unrounded total {} is not zero",
            balances.unrounded_total()
        );

        let bound = Decimal::new(5, 3) * Decimal::from(balances.len());
        prop_assert!(
            balances.total().abs() <= bound,
            "Rounded total {} exceeds {}",
            balances.total(),
            bound
        );
    }

    /// Itemized shares SHALL sum exactly to the rounded total.
    #[test]
    fn prop_itemized_shares_sum_to_total(snapshot in trip()) {
        for expense in &snapshot.expenses {
            let breakdown = ExpenseBreakdown::itemize(expense, &snapshot.participants);
            prop_assert_eq!(breakdown.allocated(), breakdown.total);
        }
    }
}
