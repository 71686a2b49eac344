//! Spend to estimated CO2e using per-subcategory conversion factors.
//!
//! Factors are kg CO2e per USD given as a (min, max) range; `mid` is the
//! arithmetic mean. Electricity is region specific and reported as zero here.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::summary::SpendSummary;

/// (category, subcategory, min, max) with factors in hundredths of kg/USD
const EMISSION_FACTORS: &[(&str, &str, i64, i64)] = &[
    ("Travel", "Public transport (bus, metro, train)", 15, 25),
    ("Travel", "Ride-hailing (Uber, Lyft)", 30, 50),
    ("Travel", "Flights (domestic, international)", 70, 150),
    ("Travel", "Car-related (fuel, parking, tolls, EV charging)", 25, 60),
    ("Food", "Groceries", 10, 20),
    ("Food", "Restaurants / Cafés", 20, 35),
    ("Food", "Fast food / takeout", 25, 40),
    ("Food", "Alcohol / bars", 20, 35),
    ("Shopping", "Clothing & fashion", 20, 50),
    ("Shopping", "Electronics & gadgets", 30, 80),
    ("Shopping", "Furniture / household goods", 25, 60),
    ("Shopping", "General e-commerce (Amazon, Walmart, etc.)", 15, 40),
    ("Housing", "Gas / heating oil", 30, 70),
    ("Housing", "Water & waste services", 5, 15),
    ("Housing", "Internet / telecom", 5, 15),
    ("Health", "Pharmacies / medical stores", 10, 25),
    ("Health", "Health insurance", 5, 15),
    ("Health", "Fitness / gym / wellness subscriptions", 5, 20),
    ("Entertainment", "Streaming services (Netflix, Spotify)", 2, 10),
    ("Entertainment", "Gaming (Steam, PlayStation)", 10, 30),
    ("Entertainment", "Events / concerts / cinema", 25, 60),
    ("Entertainment", "Books & media", 10, 30),
    ("Education", "Tuition / course fees", 5, 20),
    ("Education", "Online learning platforms (Coursera, Udemy)", 2, 10),
    ("Education", "Books, journals, educational materials", 10, 30),
    ("Finances", "Bank fees", 2, 10),
    ("Finances", "Loan / credit card payments", 2, 10),
    ("Finances", "Insurance (car, home, life)", 5, 20),
    ("Charity", "NGO contributions", 1, 5),
    ("Charity", "Religious donations", 1, 5),
];

/// Used for pairs missing from the table.
const GENERIC_FACTOR: (i64, i64) = (5, 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionMode {
    Min,
    #[default]
    Mid,
    Max,
}

impl EmissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EmissionMode::Min => "min",
            EmissionMode::Mid => "mid",
            EmissionMode::Max => "max",
        }
    }

    fn pick(self, (lo, hi): (i64, i64)) -> Decimal {
        let lo = Decimal::new(lo, 2);
        let hi = Decimal::new(hi, 2);
        match self {
            EmissionMode::Min => lo,
            EmissionMode::Max => hi,
            EmissionMode::Mid => (lo + hi) / Decimal::TWO,
        }
    }
}

impl fmt::Display for EmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmissionMode {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(EmissionMode::Min),
            "mid" => Ok(EmissionMode::Mid),
            "max" => Ok(EmissionMode::Max),
            other => Err(FinanceError::UnknownEmissionMode(other.to_string())),
        }
    }
}

fn is_electricity(category: &str, subcategory: &str) -> bool {
    category == "Housing" && subcategory.to_lowercase().starts_with("electricity")
}

fn factor_range(category: &str, subcategory: &str) -> (i64, i64) {
    EMISSION_FACTORS
        .iter()
        .find(|(c, s, _, _)| *c == category && *s == subcategory)
        .map(|&(_, _, lo, hi)| (lo, hi))
        .unwrap_or(GENERIC_FACTOR)
}

/// kg CO2e per USD for one subcategory.
pub fn factor_for(category: &str, subcategory: &str, mode: EmissionMode) -> Decimal {
    if is_electricity(category, subcategory) {
        return Decimal::ZERO;
    }
    mode.pick(factor_range(category, subcategory))
}

/// Mean of a category's subcategory factors, for category-level budgets.
pub fn category_factor(category: &str, mode: EmissionMode) -> Decimal {
    let factors: Vec<Decimal> = EMISSION_FACTORS
        .iter()
        .filter(|(c, s, _, _)| *c == category && !is_electricity(c, s))
        .map(|&(_, _, lo, hi)| mode.pick((lo, hi)))
        .collect();

    if factors.is_empty() {
        return EmissionMode::Mid.pick(GENERIC_FACTOR);
    }
    factors.iter().sum::<Decimal>() / Decimal::from(factors.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<String>,
    pub mode: EmissionMode,
    pub total_emissions_kg: Decimal,
    pub by_category: BTreeMap<String, BTreeMap<String, Decimal>>,
}

fn round_kg(kg: Decimal) -> Decimal {
    kg.round_dp_with_strategy(3, RoundingStrategy::MidpointNearestEven)
}

/// Multiply each summary leaf by its factor. Leaves and the total are
/// rounded to grams; the total sums the unrounded leaves.
pub fn compute_emissions(summary: &SpendSummary, mode: EmissionMode) -> EmissionsReport {
    let mut by_category: BTreeMap<String, BTreeMap<String, Decimal>> = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for row in summary.rows() {
        let kg = row.amount * factor_for(&row.category, &row.subcategory, mode);
        total += kg;
        by_category
            .entry(row.category)
            .or_default()
            .insert(row.subcategory, round_kg(kg));
    }

    EmissionsReport {
        statement_id: None,
        mode,
        total_emissions_kg: round_kg(total),
        by_category,
    }
}

/// Convert a category -> dollars budget into category -> kg CO2e.
pub fn budget_emissions(
    allocation: &BTreeMap<String, Decimal>,
    mode: EmissionMode,
) -> BTreeMap<String, Decimal> {
    allocation
        .iter()
        .map(|(category, dollars)| {
            (category.clone(), round_kg(*dollars * category_factor(category, mode)))
        })
        .collect()
}
