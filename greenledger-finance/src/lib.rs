//! greenledger-finance: category rules, spend summary, emissions, CSV export
//! and the statement store boundary.

pub mod category_rules;
pub mod emissions;
pub mod error;
pub mod export;
pub mod store;
pub mod summary;

pub use category_rules::{categorize, Categorized, CategoryRule, RuleSet, UNCATEGORIZED};
pub use emissions::{
    budget_emissions, category_factor, compute_emissions, factor_for, EmissionMode,
    EmissionsReport,
};
pub use error::{FinanceError, FinanceResult};
pub use export::write_transactions_csv;
pub use store::{categorize_all, CategorizedTransaction, MemoryStore, StatementStore};
pub use summary::{summarize, summarize_partial, SpendSummary, SummaryRow};
