use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names – part of the input contract
// ---------------------------------------------------------------------------

pub const COL_NAME: &str = "Name";
pub const COL_COUNTRY: &str = "Country";
pub const COL_AWARD: &str = "Award";
pub const COL_PRICE: &str = "Price";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_GDP: &str = "GDP per Capita (USD)";
pub const COL_HOUSEHOLD: &str = "Household Spending (Million US$)";

/// Every column the loader requires, in declaration order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_NAME,
    COL_COUNTRY,
    COL_AWARD,
    COL_PRICE,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_GDP,
    COL_HOUSEHOLD,
];

// ---------------------------------------------------------------------------
// Award – the Michelin recognition level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Award {
    ThreeStars,
    TwoStars,
    OneStar,
    BibGourmand,
}

impl Award {
    pub const ALL: [Award; 4] = [
        Award::ThreeStars,
        Award::TwoStars,
        Award::OneStar,
        Award::BibGourmand,
    ];

    /// Parse an award from raw text after lower-casing and trimming it.
    pub fn parse(raw: &str) -> Option<Award> {
        match normalize_award(raw).as_str() {
            "3 stars" => Some(Award::ThreeStars),
            "2 stars" => Some(Award::TwoStars),
            "1 star" => Some(Award::OneStar),
            "bib gourmand" => Some(Award::BibGourmand),
            _ => None,
        }
    }

    /// Star count for star awards, `None` for Bib Gourmand.
    pub fn stars(self) -> Option<u8> {
        match self {
            Award::ThreeStars => Some(3),
            Award::TwoStars => Some(2),
            Award::OneStar => Some(1),
            Award::BibGourmand => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Award::ThreeStars => "3 Stars",
            Award::TwoStars => "2 Stars",
            Award::OneStar => "1 Star",
            Award::BibGourmand => "Bib Gourmand",
        }
    }
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn normalize_award(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Price tier as the number of currency symbols, e.g. `"$$$"` → 3.
pub fn price_level(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().count() as u32)
    }
}

// ---------------------------------------------------------------------------
// Restaurant – one row of the base table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub country: String,
    /// Award text after normalisation (lower-cased, trimmed).
    pub award_text: String,
    /// Parsed award, `None` when the text is outside the known vocabulary.
    pub award: Option<Award>,
    pub price: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gdp_per_capita: f64,
    pub household_spending: f64,
    /// Derived: character length of `price`.
    pub price_numeric: Option<u32>,
    /// Derived: 1–3 for star awards.
    pub star_numeric: Option<u8>,
}

/// A row as it comes off disk, before validation and derived columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Award", default)]
    pub award: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<String>,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(
        rename = "GDP per Capita (USD)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub gdp_per_capita: Option<f64>,
    #[serde(
        rename = "Household Spending (Million US$)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub household_spending: Option<f64>,
}

impl RawRecord {
    /// Validate indicators and compute derived columns.
    ///
    /// Returns `None` when either economic indicator is missing or not finite;
    /// such rows never enter the base table.
    pub fn into_restaurant(self) -> Option<Restaurant> {
        let gdp_per_capita = self.gdp_per_capita.filter(|v| v.is_finite())?;
        let household_spending = self.household_spending.filter(|v| v.is_finite())?;

        let award_text = self.award.as_deref().map(normalize_award).unwrap_or_default();
        let award = Award::parse(&award_text);
        let price = self.price.filter(|p| !p.trim().is_empty());
        let price_numeric = price.as_deref().and_then(price_level);

        Some(Restaurant {
            name: self.name,
            country: self.country,
            star_numeric: award.and_then(Award::stars),
            award_text,
            award,
            price,
            latitude: self.latitude,
            longitude: self.longitude,
            gdp_per_capita,
            household_spending,
            price_numeric,
        })
    }
}

// ---------------------------------------------------------------------------
// InclusiveRange – numeric bounds used by filters and sliders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Widen to include `value`.
    fn include(&mut self, value: T) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

fn bounds_of<T: PartialOrd + Copy>(values: impl Iterator<Item = T>) -> Option<InclusiveRange<T>> {
    values.fold(None, |acc, v| match acc {
        None => Some(InclusiveRange::new(v, v)),
        Some(mut r) => {
            r.include(v);
            Some(r)
        }
    })
}

// ---------------------------------------------------------------------------
// Dataset – the immutable base table
// ---------------------------------------------------------------------------

/// The loaded base table. Built once per session and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub restaurants: Vec<Restaurant>,
    /// Rows discarded at load time for a missing economic indicator.
    pub dropped_rows: usize,
}

impl Dataset {
    /// Build the table from raw rows, dropping those without both indicators.
    pub fn from_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut restaurants = Vec::new();
        let mut dropped_rows = 0;
        for record in records {
            match record.into_restaurant() {
                Some(r) => restaurants.push(r),
                None => dropped_rows += 1,
            }
        }
        let dataset = Dataset {
            restaurants,
            dropped_rows,
        };
        for country in dataset.inconsistent_countries() {
            log::warn!("Country {country:?} carries more than one set of indicator values");
        }
        dataset
    }

    /// Number of restaurants.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn gdp_bounds(&self) -> Option<InclusiveRange<f64>> {
        bounds_of(self.restaurants.iter().map(|r| r.gdp_per_capita))
    }

    pub fn household_bounds(&self) -> Option<InclusiveRange<f64>> {
        bounds_of(self.restaurants.iter().map(|r| r.household_spending))
    }

    /// Price tiers span at least 1..=4, widened to the data.
    pub fn price_bounds(&self) -> InclusiveRange<u32> {
        let mut bounds = InclusiveRange::new(1, 4);
        for p in self.restaurants.iter().filter_map(|r| r.price_numeric) {
            bounds.include(p);
        }
        bounds
    }

    /// Countries whose rows disagree on GDP or household spending.
    pub fn inconsistent_countries(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        let mut bad: Vec<String> = Vec::new();
        for r in &self.restaurants {
            let values = (r.gdp_per_capita, r.household_spending);
            match seen.get(r.country.as_str()) {
                Some(&first) if first != values => {
                    if !bad.contains(&r.country) {
                        bad.push(r.country.clone());
                    }
                }
                Some(_) => {}
                None => {
                    seen.insert(&r.country, values);
                }
            }
        }
        bad
    }
}

// ---------------------------------------------------------------------------
// Aggregated output types
// ---------------------------------------------------------------------------

/// One row of the per-country aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub restaurant_count: usize,
    pub gdp_per_capita: f64,
    pub household_spending: f64,
}

/// Economic indicator a regression is fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    GdpPerCapita,
    HouseholdSpending,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::GdpPerCapita, Indicator::HouseholdSpending];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => COL_GDP,
            Indicator::HouseholdSpending => COL_HOUSEHOLD,
        }
    }

    pub fn value(self, summary: &CountrySummary) -> f64 {
        match self {
            Indicator::GdpPerCapita => summary.gdp_per_capita,
            Indicator::HouseholdSpending => summary.household_spending,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
