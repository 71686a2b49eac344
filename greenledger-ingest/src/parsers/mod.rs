//! Transaction line parsing strategies.
//!
//! Each strategy either recovers a full row or declines with `None`;
//! `LineParser` tries its strategies in order and the first success wins.

pub mod chase_debit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// Anchored `DATE DESC AMOUNT BALANCE` match over the whole line
    PrimaryPattern,
    /// Last two monetary tokens anywhere on a date-led line
    FallbackFromTokens,
    /// Whitespace tokens: date first, balance last, amount second-to-last
    LegacyWhitespaceSplit,
}

impl ParseStrategy {
    pub const ALL: [ParseStrategy; 3] = [
        ParseStrategy::PrimaryPattern,
        ParseStrategy::FallbackFromTokens,
        ParseStrategy::LegacyWhitespaceSplit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParseStrategy::PrimaryPattern => "primary-pattern",
            ParseStrategy::FallbackFromTokens => "fallback-from-tokens",
            ParseStrategy::LegacyWhitespaceSplit => "legacy-whitespace-split",
        }
    }

    /// Run this strategy alone on a raw line.
    pub fn apply(self, line: &str) -> Option<Transaction> {
        self.apply_collapsed(&collapse_whitespace(line))
    }

    fn apply_collapsed(self, line: &str) -> Option<Transaction> {
        match self {
            ParseStrategy::PrimaryPattern => chase_debit::parse_primary(line),
            ParseStrategy::FallbackFromTokens => chase_debit::parse_fallback(line),
            ParseStrategy::LegacyWhitespaceSplit => chase_debit::parse_legacy(line),
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s.trim())
            .ok_or_else(|| format!("unknown parse strategy: {s}"))
    }
}

/// Ordered strategy list applied to one candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineParser {
    strategies: Vec<ParseStrategy>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self {
            strategies: vec![ParseStrategy::PrimaryPattern, ParseStrategy::FallbackFromTokens],
        }
    }
}

impl LineParser {
    /// An empty list falls back to the default order.
    pub fn new(strategies: Vec<ParseStrategy>) -> Self {
        if strategies.is_empty() {
            return Self::default();
        }
        Self { strategies }
    }

    /// For layouts without clean column geometry in the extracted text.
    pub fn legacy() -> Self {
        Self {
            strategies: vec![ParseStrategy::LegacyWhitespaceSplit],
        }
    }

    pub fn strategies(&self) -> &[ParseStrategy] {
        &self.strategies
    }

    pub fn parse(&self, line: &str) -> Option<Transaction> {
        let line = collapse_whitespace(line);
        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply_collapsed(&line))
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
