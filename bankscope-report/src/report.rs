//! Aggregate parsed statements into per-category totals.
//!
//! Deterministic: the category table is scanned in order for every
//! transaction and the first keyword hit wins.

use bankscope_core::{CategorizedTransaction, Category, CategoryTable, Statement, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Running total for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    /// One entry per table category, in table order
    pub totals: Vec<CategoryTotal>,
    pub categorized: Vec<CategorizedTransaction>,
    /// Transactions no keyword matched, in encounter order
    pub others: Vec<Transaction>,
}

impl Report {
    pub fn total_for(&self, category: &str) -> Option<Decimal> {
        self.totals.iter().find(|t| t.name == category).map(|t| t.total)
    }

    /// Sum over categorized and uncategorized transactions alike
    pub fn grand_total(&self) -> Decimal {
        let categorized: Decimal = self.totals.iter().map(|t| t.total).sum();
        let others: Decimal = self.others.iter().map(|t| t.amount).sum();
        categorized + others
    }

    pub fn transaction_count(&self) -> usize {
        self.categorized.len() + self.others.len()
    }
}

pub fn categorize<'t>(txn: &Transaction, table: &'t CategoryTable) -> Option<&'t Category> {
    table.match_description(&txn.description)
}

pub fn generate_report(statements: &[Statement], table: &CategoryTable) -> Report {
    let mut totals: Vec<CategoryTotal> = table
        .names()
        .map(|name| CategoryTotal {
            name: name.to_string(),
            total: Decimal::ZERO,
            count: 0,
        })
        .collect();
    let mut categorized = Vec::new();
    let mut others = Vec::new();

    for statement in statements {
        for txn in &statement.transactions {
            let Some(category) = categorize(txn, table) else {
                others.push(txn.clone());
                continue;
            };

            // names are unique and totals mirrors the table
            if let Some(slot) = totals.iter_mut().find(|t| t.name == category.name) {
                slot.total += txn.amount;
                slot.count += 1;
            }
            debug!(category = %category.name, description = %txn.description, "categorized");
            categorized.push(CategorizedTransaction {
                transaction: txn.clone(),
                category: category.name.clone(),
            });
        }
    }

    Report {
        totals,
        categorized,
        others,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(desc: &str, cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            desc,
            Decimal::new(cents, 2),
        )
    }

    fn statement(txns: Vec<Transaction>) -> Statement {
        Statement {
            source: "s.pdf".into(),
            transactions: txns,
        }
    }

    fn table() -> CategoryTable {
        CategoryTable::new(vec![
            Category::new("Food", ["GROCERY", "GRABFOOD"]),
            Category::new("Transport", ["GRAB", "MRT"]),
            Category::new("Bills", ["SP SERVICES"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_match() {
        let table = CategoryTable::new(vec![Category::new("Food", ["GROCERY"])]).unwrap();
        let report = generate_report(&[statement(vec![txn("GROCERY MART", 4567)])], &table);

        assert_eq!(report.total_for("Food"), Some(Decimal::new(4567, 2)));
        assert_eq!(report.categorized.len(), 1);
        assert_eq!(report.categorized[0].category, "Food");
        assert!(report.others.is_empty());
    }

    #[test]
    fn test_unmatched_goes_to_others() {
        let atm = statement(vec![txn("ATM WITHDRAWAL", -10000)]);
        let report = generate_report(&[atm], &table());
        assert_eq!(report.others.len(), 1);
        assert_eq!(report.others[0].description, "ATM WITHDRAWAL");
        assert_eq!(report.others[0].amount, Decimal::new(-10000, 2));
        assert!(report.categorized.is_empty());
    }

    #[test]
    fn test_every_category_present_with_zero() {
        let report = generate_report(&[], &table());
        let names: Vec<_> = report.totals.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport", "Bills"]);
        for total in &report.totals {
            assert_eq!(total.total, Decimal::ZERO);
            assert_eq!(total.count, 0);
        }
    }

    #[test]
    fn test_first_category_in_table_order_wins() {
        // "GRABFOOD" contains both GRABFOOD (Food) and GRAB (Transport)
        let order = statement(vec![txn("GRABFOOD ORDER", 1500)]);
        let report = generate_report(&[order], &table());
        assert_eq!(report.total_for("Food"), Some(Decimal::new(1500, 2)));
        assert_eq!(report.total_for("Transport"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_totals_combine_across_statements() {
        let statements = vec![
            statement(vec![txn("GROCERY MART", 4567)]),
            statement(vec![txn("GROCERY OUTLET", 1033)]),
        ];
        let report = generate_report(&statements, &table());
        assert_eq!(report.totals.iter().filter(|t| t.name == "Food").count(), 1);
        assert_eq!(report.total_for("Food"), Some(Decimal::new(5600, 2)));
        assert_eq!(report.totals[0].count, 2);
    }

    #[test]
    fn test_signed_amounts_net_out() {
        let txns = vec![txn("MRT TOPUP", 2000), txn("MRT REFUND", -2000)];
        let report = generate_report(&[statement(txns)], &table());
        assert_eq!(report.total_for("Transport"), Some(Decimal::ZERO));
        assert_eq!(report.totals[1].count, 2);
    }

    #[test]
    fn test_each_transaction_lands_in_exactly_one_place() {
        let txns = vec![
            txn("GROCERY", 100),
            txn("GRAB RIDE", 200),
            txn("NETFLIX", 300),
            txn("SP SERVICES", 400),
            txn("NETFLIX", 300),
        ];
        let report = generate_report(&[statement(txns.clone())], &table());

        assert_eq!(report.transaction_count(), txns.len());
        let counted: usize = report.totals.iter().map(|t| t.count).sum();
        assert_eq!(counted, report.categorized.len());
        assert_eq!(report.others.len(), 2);
        assert_eq!(report.grand_total(), Decimal::new(1300, 2));
    }

    #[test]
    fn test_others_keep_encounter_order() {
        let statements = vec![
            statement(vec![txn("B", 1), txn("GROCERY", 2)]),
            statement(vec![txn("A", 3)]),
        ];
        let report = generate_report(&statements, &table());
        let descs: Vec<_> = report.others.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["B", "A"]);
    }

    #[test]
    fn test_input_statements_are_untouched() {
        let statements = vec![statement(vec![txn("GROCERY", 100)])];
        let before = statements.clone();
        let _ = generate_report(&statements, &table());
        assert_eq!(statements, before);
    }
}
