//! Summary statistics over a set of transactions.
//!
//! Every ratio is reported as a percentage. Ratios with a zero denominator
//! (an empty set, or no money moved) are reported as `0.0` rather than `NaN`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transaction::{Category, Transaction, TransactionType};

/// The money moved in one category and its share of the type total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// The sum of the amounts filed under the category.
    pub amount: f64,
    /// `amount` as a percentage of the sum for the transaction type.
    pub pct: f64,
}

/// Counts, turnover and category breakdowns for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// The number of transactions.
    pub total_count: usize,
    /// The number of income transactions.
    pub income_count: usize,
    /// The number of expense transactions.
    pub expense_count: usize,
    /// `income_count` as a percentage of `total_count`.
    pub income_count_pct: f64,
    /// `expense_count` as a percentage of `total_count`.
    #[serde(rename = "expenceCountPct")]
    pub expense_count_pct: f64,
    /// The total amount earned.
    pub income_sum: f64,
    /// The total amount spent.
    pub expense_sum: f64,
    /// `income_sum - expense_sum`.
    pub net_balance: f64,
    /// `income_sum` as a percentage of the money moved.
    pub income_sum_pct: f64,
    /// `expense_sum` as a percentage of the money moved.
    #[serde(rename = "expenceSumPct")]
    pub expense_sum_pct: f64,
    /// Only categories with income are present.
    pub income_by_category: BTreeMap<Category, CategoryShare>,
    /// Only categories with expenses are present.
    pub expense_by_category: BTreeMap<Category, CategoryShare>,
}

impl TransactionSummary {
    /// Summarise `transactions` in a single pass.
    ///
    /// The transactions are expected to belong to one user.
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut income_count = 0;
        let mut expense_count = 0;
        let mut income_sum = 0.0;
        let mut expense_sum = 0.0;
        let mut income_totals: BTreeMap<Category, f64> = BTreeMap::new();
        let mut expense_totals: BTreeMap<Category, f64> = BTreeMap::new();

        for transaction in transactions {
            let (count, sum, totals) = match transaction.transaction_type {
                TransactionType::Income => {
                    (&mut income_count, &mut income_sum, &mut income_totals)
                }
                TransactionType::Expense => {
                    (&mut expense_count, &mut expense_sum, &mut expense_totals)
                }
            };

            *count += 1;
            *sum += transaction.amount;
            *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
        }

        let total_count = transactions.len();
        let turnover = income_sum + expense_sum;

        Self {
            total_count,
            income_count,
            expense_count,
            income_count_pct: percentage(income_count as f64, total_count as f64),
            expense_count_pct: percentage(expense_count as f64, total_count as f64),
            income_sum,
            expense_sum,
            net_balance: income_sum - expense_sum,
            income_sum_pct: percentage(income_sum, turnover),
            expense_sum_pct: percentage(expense_sum, turnover),
            income_by_category: category_shares(income_totals, income_sum),
            expense_by_category: category_shares(expense_totals, expense_sum),
        }
    }
}

/// `part` as a percentage of `whole`, or `0.0` if `whole` is zero.
fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }

    part / whole * 100.0
}

fn category_shares(
    totals: BTreeMap<Category, f64>,
    type_sum: f64,
) -> BTreeMap<Category, CategoryShare> {
    totals
        .into_iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(category, amount)| {
            (
                category,
                CategoryShare {
                    amount,
                    pct: percentage(amount, type_sum),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        transaction::{Category, Transaction, TransactionType},
    };

    use super::{CategoryShare, TransactionSummary, percentage};

    fn transaction(
        amount: f64,
        transaction_type: TransactionType,
        category: Category,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 1,
            owner: UserID::new(1),
            amount,
            transaction_type,
            category,
            date,
            reference: String::new(),
            description: String::new(),
        }
    }

    #[track_caller]
    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 0.01, "got {got}, want {want}");
    }

    #[test]
    fn empty_set_is_all_zeroes() {
        let summary = TransactionSummary::new(&[]);

        assert_eq!(summary, TransactionSummary::default());
        for pct in [
            summary.income_count_pct,
            summary.expense_count_pct,
            summary.income_sum_pct,
            summary.expense_sum_pct,
        ] {
            assert_eq!(pct, 0.0);
        }
    }

    #[test]
    fn income_and_expense_scenario() {
        let transactions = [
            transaction(
                100.0,
                TransactionType::Income,
                Category::Salary,
                date!(2024 - 01 - 01),
            ),
            transaction(
                40.0,
                TransactionType::Expense,
                Category::Food,
                date!(2024 - 01 - 02),
            ),
        ];

        let summary = TransactionSummary::new(&transactions);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.income_count, 1);
        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.income_count_pct, 50.0);
        assert_eq!(summary.expense_count_pct, 50.0);
        assert_eq!(summary.income_sum, 100.0);
        assert_eq!(summary.expense_sum, 40.0);
        assert_eq!(summary.net_balance, 60.0);
        assert_close(summary.income_sum_pct, 71.43);
        assert_close(summary.expense_sum_pct, 28.57);
        assert_eq!(
            summary.income_by_category,
            BTreeMap::from([(
                Category::Salary,
                CategoryShare {
                    amount: 100.0,
                    pct: 100.0
                }
            )])
        );
        assert_eq!(
            summary.expense_by_category,
            BTreeMap::from([(
                Category::Food,
                CategoryShare {
                    amount: 40.0,
                    pct: 100.0
                }
            )])
        );
    }

    #[test]
    fn counts_and_sums_are_consistent() {
        let transactions: Vec<Transaction> = (0..30)
            .map(|i| {
                let transaction_type = TransactionType::ALL[i % 2];
                let category = Category::ALL[i % Category::ALL.len()];
                transaction(
                    (i * 7 % 13) as f64 + 0.25,
                    transaction_type,
                    category,
                    date!(2024 - 03 - 01),
                )
            })
            .collect();

        let summary = TransactionSummary::new(&transactions);

        assert_eq!(
            summary.income_count + summary.expense_count,
            summary.total_count
        );
        assert_eq!(
            summary.net_balance,
            summary.income_sum - summary.expense_sum
        );
        let income_category_sum: f64 = summary
            .income_by_category
            .values()
            .map(|share| share.amount)
            .sum();
        let expense_category_sum: f64 = summary
            .expense_by_category
            .values()
            .map(|share| share.amount)
            .sum();
        assert_close(income_category_sum, summary.income_sum);
        assert_close(expense_category_sum, summary.expense_sum);
        let pct_sum: f64 = summary
            .expense_by_category
            .values()
            .map(|share| share.pct)
            .sum();
        assert_close(pct_sum, 100.0);
    }

    #[test]
    fn categories_without_activity_are_absent() {
        let transactions = [
            transaction(
                10.0,
                TransactionType::Expense,
                Category::Travel,
                date!(2024 - 01 - 01),
            ),
            transaction(
                5.0,
                TransactionType::Expense,
                Category::Travel,
                date!(2024 - 01 - 02),
            ),
            transaction(
                0.0,
                TransactionType::Expense,
                Category::Medical,
                date!(2024 - 01 - 03),
            ),
        ];

        let summary = TransactionSummary::new(&transactions);

        assert!(summary.income_by_category.is_empty());
        assert_eq!(
            summary.expense_by_category.keys().collect::<Vec<_>>(),
            vec![&Category::Travel]
        );
        assert_eq!(summary.expense_by_category[&Category::Travel].amount, 15.0);
    }

    #[test]
    fn zero_amounts_do_not_produce_nan() {
        let transactions = [transaction(
            0.0,
            TransactionType::Income,
            Category::Salary,
            date!(2024 - 01 - 01),
        )];

        let summary = TransactionSummary::new(&transactions);

        assert_eq!(summary.income_count_pct, 100.0);
        assert_eq!(summary.income_sum_pct, 0.0);
        assert_eq!(summary.expense_sum_pct, 0.0);
        assert!(summary.income_by_category.is_empty());
    }

    #[test]
    fn percentage_of_zero_is_zero() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let transactions = [transaction(
            40.0,
            TransactionType::Expense,
            Category::Food,
            date!(2024 - 01 - 02),
        )];

        let json = serde_json::to_value(TransactionSummary::new(&transactions)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "totalCount": 1,
                "incomeCount": 0,
                "expenseCount": 1,
                "incomeCountPct": 0.0,
                "expenceCountPct": 100.0,
                "incomeSum": 0.0,
                "expenseSum": 40.0,
                "netBalance": -40.0,
                "incomeSumPct": 0.0,
                "expenceSumPct": 100.0,
                "incomeByCategory": {},
                "expenseByCategory": {"food": {"amount": 40.0, "pct": 100.0}},
            })
        );
    }
}
