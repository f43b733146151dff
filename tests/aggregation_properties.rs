// Property-based tests for transaction aggregation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack::transaction::{
    compute_aggregate_stats, compute_monthly_summary, StatsError, Transaction, TransactionKind,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const CATEGORIES: [&str; 5] = ["Food", "food", "Rent", "Salary", "Gift"];

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        any::<bool>(),
        0..CATEGORIES.len(),
        0i64..10_000_000,
        2020i32..2026,
        1u32..=12,
        1u32..=28,
    )
        .prop_map(|(income, category, cents, year, month, day)| {
            let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Transaction {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                kind: if income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                },
                category: CATEGORIES[category].to_string(),
                amount: Decimal::new(cents, 2),
                occurred_on: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                description: None,
                created_at: timestamp,
                updated_at: timestamp,
            }
        })
}

fn arb_transactions() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(arb_transaction(), 0..60)
}

fn sum_of(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

// ---------------------------------------------------------------------------
// Aggregate stats
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn stats_balance_is_income_minus_expense(transactions in arb_transactions()) {
        let stats = compute_aggregate_stats(&transactions).unwrap();

        prop_assert_eq!(stats.total_income, sum_of(&transactions, TransactionKind::Income));
        prop_assert_eq!(stats.total_expense, sum_of(&transactions, TransactionKind::Expense));
        prop_assert_eq!(stats.balance, stats.total_income - stats.total_expense);
        prop_assert_eq!(stats.transaction_count, transactions.len());
    }

    #[test]
    fn stats_category_totals_cover_all_amounts(transactions in arb_transactions()) {
        let stats = compute_aggregate_stats(&transactions).unwrap();

        let category_sum: Decimal = stats.category_totals.values().copied().sum();
        prop_assert_eq!(category_sum, stats.total_income + stats.total_expense);

        for key in stats.category_totals.keys() {
            prop_assert!(transactions.iter().any(|t| &t.category == key));
        }
    }

    #[test]
    fn stats_ignore_input_order(transactions in arb_transactions()) {
        let mut reversed = transactions.clone();
        reversed.reverse();

        prop_assert_eq!(
            compute_aggregate_stats(&transactions).unwrap(),
            compute_aggregate_stats(&reversed).unwrap()
        );
        prop_assert_eq!(
            compute_monthly_summary(&transactions).unwrap(),
            compute_monthly_summary(&reversed).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Monthly summary
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn monthly_buckets_sum_to_totals(transactions in arb_transactions()) {
        let summary = compute_monthly_summary(&transactions).unwrap();
        let stats = compute_aggregate_stats(&transactions).unwrap();

        prop_assert_eq!(summary.iter().count(), 12);
        let income: Decimal = summary.iter().map(|(_, m)| m.income).sum();
        let expense: Decimal = summary.iter().map(|(_, m)| m.expense).sum();
        prop_assert_eq!(income, stats.total_income);
        prop_assert_eq!(expense, stats.total_expense);
    }

    #[test]
    fn negative_amount_aborts_both_computations(
        mut transactions in prop::collection::vec(arb_transaction(), 1..30),
        index in any::<prop::sample::Index>(),
        cents in 1i64..1_000_000,
    ) {
        let i = index.index(transactions.len());
        transactions[i].amount = Decimal::new(-cents, 2);
        let id = transactions[i].id;

        prop_assert_eq!(
            compute_aggregate_stats(&transactions),
            Err(StatsError::NegativeAmount { id })
        );
        prop_assert_eq!(
            compute_monthly_summary(&transactions),
            Err(StatsError::NegativeAmount { id })
        );
    }
}
