//! Categorized ledger as CSV:
//! Date,Description,Amount,Category,Subcategory

use std::io::Write;

use crate::error::FinanceResult;
use crate::store::CategorizedTransaction;

const HEADER: [&str; 5] = ["Date", "Description", "Amount", "Category", "Subcategory"];

/// With `statement_year`, dates are written as ISO `YYYY-MM-DD`; rows whose
/// `MM/DD` is not a real date in that year keep the raw text.
pub fn write_transactions_csv<W: Write>(
    writer: W,
    rows: &[CategorizedTransaction],
    statement_year: Option<i32>,
) -> FinanceResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for row in rows {
        let txn = &row.transaction;
        let date = statement_year
            .and_then(|year| txn.date_in_year(year))
            .map(|d| d.to_string())
            .unwrap_or_else(|| txn.date.clone());
        let amount = txn.amount.to_string();

        wtr.write_record([
            date.as_str(),
            txn.description.as_str(),
            amount.as_str(),
            row.category.as_str(),
            row.subcategory.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
