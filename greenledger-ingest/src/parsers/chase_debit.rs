//! Chase Debit (Checking) transaction rows
//!
//! Rows in the extracted "TRANSACTION DETAIL" section, after whitespace
//! collapsing:
//!   06/16 Card Purchase 06/14 Sq *Vigneshwara LLC Tempe AZ Card 4781 -11.94 7,122.53
//!   06/18 Payroll Acme Inc PPD ID: 1234 2000.00 9,077.53
//!
//! Every function here expects an already collapsed line.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::amount::normalize;
use crate::types::Transaction;

/// One monetary column: optional sign, grouped or plain digits, two decimals.
const MONEY: &str = r"-?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}\b").expect("date regex"))
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MONEY).expect("money regex"))
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<date>\d{{2}}/\d{{2}})\s+(?P<desc>.*?)\s+(?P<amount>{MONEY})\s+(?P<balance>{MONEY})$"
        ))
        .expect("row regex")
    })
}

/// DATE DESCRIPTION AMOUNT BALANCE, anchored at both ends.
pub fn parse_primary(line: &str) -> Option<Transaction> {
    let caps = row_re().captures(line)?;
    build(
        &caps["date"],
        caps["desc"].trim(),
        &caps["amount"],
        &caps["balance"],
    )
}

/// Salvage a date-led row whose tail is glued or trailed by junk: the last
/// two monetary tokens are amount and balance.
///
/// The description ends at the last occurrence of the amount text, so a
/// balance that ends with the same digits (amount `1.00`, balance `21.00`)
/// pulls part of the columns into the description.
pub fn parse_fallback(line: &str) -> Option<Transaction> {
    if !date_re().is_match(line) {
        return None;
    }

    let tokens: Vec<&str> = money_re().find_iter(line).map(|m| m.as_str()).collect();
    let [.., amount, balance] = tokens.as_slice() else {
        return None;
    };

    let date = line.split(' ').next()?;
    let cut = line.rfind(amount)?;
    let description = line.get(date.len()..cut)?.trim();

    build(date, description, amount, balance)
}

/// Whitespace tokens: date first, balance last, amount second-to-last.
pub fn parse_legacy(line: &str) -> Option<Transaction> {
    if !date_re().is_match(line) {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let [date, middle @ .., amount, balance] = parts.as_slice() else {
        return None;
    };
    if middle.is_empty() {
        return None;
    }

    build(date, &middle.join(" "), amount, balance)
}

fn build(date: &str, description: &str, amount: &str, balance: &str) -> Option<Transaction> {
    let amount = normalize(amount)
        .inspect_err(|err| debug!(%err, date, "rejecting row"))
        .ok()?;
    let balance = normalize(balance)
        .inspect_err(|err| debug!(%err, date, "rejecting row"))
        .ok()?;

    Some(Transaction::new(date, description, amount, Some(balance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const CARD_ROW: &str =
        "06/16 Card Purchase 06/14 Sq *Vigneshwara LLC Tempe AZ Card 4781 -11.94 7,122.53";

    #[test]
    fn test_parse_chase_debit_basic() {
        let txn = parse_primary(CARD_ROW).unwrap();
        assert_eq!(txn.date, "06/16");
        assert_eq!(
            txn.description,
            "Card Purchase 06/14 Sq *Vigneshwara LLC Tempe AZ Card 4781"
        );
        assert_eq!(txn.amount, Decimal::new(-1194, 2));
        assert_eq!(txn.balance, Some(Decimal::new(712253, 2)));
    }

    #[test]
    fn test_numbers_inside_description_stay_in_description() {
        let txn = parse_primary("06/16 Uber Trip 123 -11.94 7,122.53").unwrap();
        assert_eq!(txn.description, "Uber Trip 123");

        let txn = parse_primary("06/16 Refund 5.00 1.00 2.00 3.00").unwrap();
        assert_eq!(txn.description, "Refund 5.00 1.00");
        assert_eq!(txn.amount, Decimal::new(200, 2));
        assert_eq!(txn.balance, Some(Decimal::new(300, 2)));
    }

    #[test]
    fn test_ungrouped_deposit() {
        let txn = parse_primary("06/18 Paycheck Deposit 2000.00 9,077.53").unwrap();
        assert_eq!(txn.amount, Decimal::new(200000, 2));
    }

    #[test]
    fn test_primary_and_fallback_agree_on_clean_rows() {
        for line in [
            CARD_ROW,
            "06/16 Uber Trip 123 -11.94 7,122.53",
            "06/17 Whole Foods Market -45.00 7,077.53",
            "06/18 Paycheck Deposit 2000.00 9,077.53",
            "07/01 Discover E-Payment 8148 Web ID: 2510020270 -1,700.41 5,377.12",
        ] {
            let primary = parse_primary(line).unwrap();
            let fallback = parse_fallback(line).unwrap();
            assert_eq!(
                (primary.amount, primary.balance),
                (fallback.amount, fallback.balance),
                "{line}"
            );
        }
    }

    #[test]
    fn test_fallback_requires_date_and_two_tokens() {
        assert!(parse_fallback("Ending Balance 7,122.53 6,000.00").is_none());
        assert!(parse_fallback("06/16 Only One Amount -11.94").is_none());
        assert!(parse_fallback("6/16 Short Date -11.94 7,122.53 x").is_none());
    }

    #[test]
    fn test_fallback_mis_splits_when_balance_ends_with_amount() {
        // rfind("1.00") lands inside "21.00"
        let txn = parse_fallback("06/16 Fee 1.00 21.00 x").unwrap();
        assert_eq!(txn.amount, Decimal::new(100, 2));
        assert_eq!(txn.balance, Some(Decimal::new(2100, 2)));
        assert_eq!(txn.description, "Fee 1.00 2");
    }

    #[test]
    fn test_legacy_split() {
        let txn = parse_legacy("06/16 Uber Trip -11.94 7,122.53").unwrap();
        assert_eq!(txn.description, "Uber Trip");
        assert!(parse_legacy("06/16 -11.94 7,122.53").is_none());
        assert!(parse_legacy("06/16 Uber Trip -11.94 balance").is_none());
    }
}
