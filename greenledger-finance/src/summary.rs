//! Spend summary: outflows grouped by (category, subcategory).
//!
//! Accumulation is an exact decimal sum, so partial summaries over any split
//! of the ledger merge to the same totals. Rounding happens once, in
//! [`SpendSummary::finalize`].

use std::collections::BTreeMap;

use greenledger_ingest::Transaction;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_rules::{Categorized, RuleSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendSummary {
    /// category -> subcategory -> absolute spend; only non-empty categories
    pub summary: BTreeMap<String, BTreeMap<String, Decimal>>,
    /// Absolute spend that matched no rule
    pub uncategorized_total: Decimal,
}

/// One flattened leaf of a summary, the shape stored per statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub category: String,
    pub subcategory: String,
    pub amount: Decimal,
}

impl SpendSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `spend` (already absolute) under a label.
    pub fn record(&mut self, label: Categorized, spend: Decimal) {
        if label.is_uncategorized() {
            self.uncategorized_total += spend;
            return;
        }
        *self
            .summary
            .entry(label.category.to_string())
            .or_default()
            .entry(label.subcategory.to_string())
            .or_default() += spend;
    }

    /// Deposits and zero amounts contribute nothing.
    pub fn add_transaction(&mut self, rules: &RuleSet, txn: &Transaction) {
        if let Some(spend) = txn.spend() {
            self.record(rules.categorize(&txn.description), spend);
        }
    }

    /// Combine two unrounded partial summaries.
    pub fn merge(mut self, other: SpendSummary) -> SpendSummary {
        for (category, subs) in other.summary {
            let into = self.summary.entry(category).or_default();
            for (subcategory, amount) in subs {
                *into.entry(subcategory).or_default() += amount;
            }
        }
        self.uncategorized_total += other.uncategorized_total;
        self
    }

    /// Round every value to cents, banker's rounding.
    pub fn finalize(mut self) -> SpendSummary {
        for subs in self.summary.values_mut() {
            for amount in subs.values_mut() {
                *amount = round_cents(*amount);
            }
        }
        self.uncategorized_total = round_cents(self.uncategorized_total);
        self
    }

    pub fn get(&self, category: &str, subcategory: &str) -> Option<Decimal> {
        self.summary.get(category)?.get(subcategory).copied()
    }

    /// Sum of every categorized leaf plus the uncategorized total.
    pub fn total_spend(&self) -> Decimal {
        self.rows().map(|row| row.amount).sum::<Decimal>() + self.uncategorized_total
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.uncategorized_total.is_zero()
    }

    pub fn rows(&self) -> impl Iterator<Item = SummaryRow> + '_ {
        self.summary.iter().flat_map(|(category, subs)| {
            subs.iter().map(move |(subcategory, amount)| SummaryRow {
                category: category.clone(),
                subcategory: subcategory.clone(),
                amount: *amount,
            })
        })
    }

    /// Rebuild from stored leaf rows (no uncategorized total is stored).
    pub fn from_rows<I: IntoIterator<Item = SummaryRow>>(rows: I) -> Self {
        let mut out = Self::new();
        for row in rows {
            *out.summary
                .entry(row.category)
                .or_default()
                .entry(row.subcategory)
                .or_default() += row.amount;
        }
        out
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Unrounded fold over a slice; use for partial sums before [`SpendSummary::merge`].
pub fn summarize_partial(rules: &RuleSet, transactions: &[Transaction]) -> SpendSummary {
    transactions
        .iter()
        .fold(SpendSummary::new(), |mut acc, txn| {
            acc.add_transaction(rules, txn);
            acc
        })
}

/// Spend summary of a ledger, rounded for output.
pub fn summarize(rules: &RuleSet, transactions: &[Transaction]) -> SpendSummary {
    let summary = summarize_partial(rules, transactions).finalize();
    debug!(
        transactions = transactions.len(),
        categories = summary.summary.len(),
        uncategorized = %summary.uncategorized_total,
        "summarized spend"
    );
    summary
}
