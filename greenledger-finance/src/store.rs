//! Statement persistence boundary.
//!
//! Transactions are insert-or-ignore on (statement, date, description,
//! amount); summary leaves are upserted on (statement, category,
//! subcategory) with the last write winning.

use std::collections::{BTreeMap, HashSet};

use greenledger_ingest::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category_rules::RuleSet;
use crate::emissions::{compute_emissions, EmissionMode, EmissionsReport};
use crate::summary::{SpendSummary, SummaryRow};

pub const DEFAULT_SOURCE: &str = "chase_pdf";

/// A ledger row with its category labels, as stored and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: String,
    pub subcategory: String,
    pub source: String,
}

impl CategorizedTransaction {
    pub fn categorize(rules: &RuleSet, transaction: Transaction) -> Self {
        let label = rules.categorize(&transaction.description);
        Self {
            transaction,
            category: label.category.to_string(),
            subcategory: label.subcategory.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

pub fn categorize_all(
    rules: &RuleSet,
    transactions: Vec<Transaction>,
) -> Vec<CategorizedTransaction> {
    transactions
        .into_iter()
        .map(|txn| CategorizedTransaction::categorize(rules, txn))
        .collect()
}

pub trait StatementStore {
    /// Returns how many rows were new.
    fn insert_transactions(&mut self, statement_id: &str, rows: &[CategorizedTransaction]) -> usize;

    fn upsert_summary(&mut self, statement_id: &str, summary: &SpendSummary);

    fn summary_rows(&self, statement_id: &str) -> Vec<SummaryRow>;

    fn transactions(&self, statement_id: &str) -> Vec<CategorizedTransaction>;

    /// `None` when nothing was stored for the statement.
    fn emissions(&self, statement_id: &str, mode: EmissionMode) -> Option<EmissionsReport> {
        let rows = self.summary_rows(statement_id);
        if rows.is_empty() {
            return None;
        }
        let mut report = compute_emissions(&SpendSummary::from_rows(rows), mode);
        report.statement_id = Some(statement_id.to_string());
        Some(report)
    }
}

type TransactionKey = (String, String, String, Decimal);

#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: Vec<(String, CategorizedTransaction)>,
    keys: HashSet<TransactionKey>,
    summaries: BTreeMap<(String, String, String), Decimal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatementStore for MemoryStore {
    fn insert_transactions(
        &mut self,
        statement_id: &str,
        rows: &[CategorizedTransaction],
    ) -> usize {
        let mut inserted = 0;
        for row in rows {
            let key = (
                statement_id.to_string(),
                row.transaction.date.clone(),
                row.transaction.description.clone(),
                row.transaction.amount,
            );
            if self.keys.insert(key) {
                self.transactions.push((statement_id.to_string(), row.clone()));
                inserted += 1;
            }
        }
        inserted
    }

    fn upsert_summary(&mut self, statement_id: &str, summary: &SpendSummary) {
        for row in summary.rows() {
            self.summaries.insert(
                (statement_id.to_string(), row.category, row.subcategory),
                row.amount,
            );
        }
    }

    fn summary_rows(&self, statement_id: &str) -> Vec<SummaryRow> {
        self.summaries
            .iter()
            .filter(|((sid, _, _), _)| sid == statement_id)
            .map(|((_, category, subcategory), amount)| SummaryRow {
                category: category.clone(),
                subcategory: subcategory.clone(),
                amount: *amount,
            })
            .collect()
    }

    fn transactions(&self, statement_id: &str) -> Vec<CategorizedTransaction> {
        self.transactions
            .iter()
            .filter(|(sid, _)| sid == statement_id)
            .map(|(_, row)| row.clone())
            .collect()
    }
}
