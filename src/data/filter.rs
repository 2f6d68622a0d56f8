use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Award, InclusiveRange, Restaurant};

// ---------------------------------------------------------------------------
// Filter parameters: the caller-supplied predicate configuration
// ---------------------------------------------------------------------------

/// Broad award category for the award-type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwardType {
    Stars,
    BibGourmand,
}

/// How restaurants are selected by award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AwardFilter {
    /// Multi-select of award labels. An empty set means "no constraint".
    Labels(BTreeSet<Award>),
    /// Award-type radio plus, for `Stars`, the accepted star counts.
    ByType {
        award_type: AwardType,
        star_counts: BTreeSet<u8>,
    },
}

impl Default for AwardFilter {
    fn default() -> Self {
        AwardFilter::Labels(BTreeSet::new())
    }
}

impl AwardFilter {
    fn is_unconstrained(&self) -> bool {
        matches!(self, AwardFilter::Labels(set) if set.is_empty())
    }

    fn matches(&self, r: &Restaurant) -> bool {
        match self {
            AwardFilter::Labels(set) => {
                set.is_empty() || r.award.is_some_and(|a| set.contains(&a))
            }
            AwardFilter::ByType {
                award_type: AwardType::BibGourmand,
                ..
            } => r.award == Some(Award::BibGourmand),
            AwardFilter::ByType {
                award_type: AwardType::Stars,
                star_counts,
            } => r.star_numeric.is_some_and(|s| star_counts.contains(&s)),
        }
    }
}

/// Conjunction of all row predicates. `Default` constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Case-insensitive substring of `Name`; empty means no constraint.
    pub name_contains: String,
    /// Case-insensitive substring of `Country`; empty means no constraint.
    pub country_contains: String,
    pub award: AwardFilter,
    /// Inclusive bounds on `Price_Numeric`. Rows without a price never match.
    pub price_range: Option<InclusiveRange<u32>>,
    pub gdp_range: Option<InclusiveRange<f64>>,
    pub household_spending_range: Option<InclusiveRange<f64>>,
}

impl FilterParams {
    /// True when no predicate is active, so filtering is the identity.
    pub fn is_unconstrained(&self) -> bool {
        self.name_contains.is_empty()
            && self.country_contains.is_empty()
            && self.award.is_unconstrained()
            && self.price_range.is_none()
            && self.gdp_range.is_none()
            && self.household_spending_range.is_none()
    }

    /// Prepared form with the text needles lower-cased once.
    fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            params: self,
            name: self.name_contains.to_lowercase(),
            country: self.country_contains.to_lowercase(),
        }
    }
}

struct CompiledFilter<'a> {
    params: &'a FilterParams,
    name: String,
    country: String,
}

impl CompiledFilter<'_> {
    fn matches(&self, r: &Restaurant) -> bool {
        let p = self.params;
        contains_ci(&r.name, &self.name)
            && contains_ci(&r.country, &self.country)
            && p.award.matches(r)
            && p.price_range
                .map_or(true, |range| r.price_numeric.is_some_and(|v| range.contains(v)))
            && p.gdp_range.map_or(true, |range| range.contains(r.gdp_per_capita))
            && p.household_spending_range
                .map_or(true, |range| range.contains(r.household_spending))
    }
}

/// Literal case-insensitive substring test; `needle` is already lower-cased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of restaurants that pass every active predicate, in input order.
pub fn filtered_indices(rows: &[Restaurant], params: &FilterParams) -> Vec<usize> {
    if params.is_unconstrained() {
        return (0..rows.len()).collect();
    }
    let compiled = params.compile();
    rows.iter()
        .enumerate()
        .filter(|(_, r)| compiled.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Return the matching rows as a new table, preserving input order.
pub fn filter_rows(rows: &[Restaurant], params: &FilterParams) -> Vec<Restaurant> {
    filtered_indices(rows, params)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dataset, RawRecord};

    fn record(name: &str, country: &str, award: &str, price: Option<&str>, gdp: f64, hh: f64) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            country: country.to_string(),
            award: Some(award.to_string()),
            price: price.map(str::to_string),
            latitude: Some(0.0),
            longitude: Some(0.0),
            gdp_per_capita: Some(gdp),
            household_spending: Some(hh),
        }
    }

    fn sample() -> Vec<Restaurant> {
        Dataset::from_records(vec![
            record("Le Bernardin", "USA", "3 Stars", Some("$$$$"), 70000.0, 15_000_000.0),
            record("Taqueria Uno", "Mexico", "Bib Gourmand", Some("$"), 10000.0, 900_000.0),
            record("Sukiyabashi", "Japan", "2 Stars", Some("$$$"), 35000.0, 2_800_000.0),
            record("Noma", "Denmark", "1 Star", None, 60000.0, 200_000.0),
            record("Bistro Japonais", "France", "1 Star", Some("$$"), 40000.0, 1_500_000.0),
            record("Mystery", "France", "selected", Some("$$"), 40000.0, 1_500_000.0),
        ])
        .restaurants
    }

    fn names(rows: &[Restaurant]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_default_params_return_everything() {
        let rows = sample();
        let params = FilterParams::default();
        assert!(params.is_unconstrained());
        assert_eq!(filter_rows(&rows, &params), rows);
    }

    #[test]
    fn test_text_filters_case_insensitive() {
        let rows = sample();
        let params = FilterParams {
            name_contains: "JAPON".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_rows(&rows, &params)), vec!["Bistro Japonais"]);

        let params = FilterParams {
            country_contains: "fra".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_rows(&rows, &params)), vec!["Bistro Japonais", "Mystery"]);
    }

    #[test]
    fn test_substring_is_literal() {
        let rows = sample();
        let params = FilterParams {
            name_contains: "b.*".to_string(),
            ..Default::default()
        };
        assert!(filter_rows(&rows, &params).is_empty());
    }

    #[test]
    fn test_award_labels() {
        let rows = sample();
        let params = FilterParams {
            award: AwardFilter::Labels([Award::OneStar, Award::BibGourmand].into()),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_rows(&rows, &params)),
            vec!["Taqueria Uno", "Noma", "Bistro Japonais"]
        );
    }

    #[test]
    fn test_award_type_stars_excludes_other_counts_and_bib() {
        let rows = sample();
        let params = FilterParams {
            award: AwardFilter::ByType {
                award_type: AwardType::Stars,
                star_counts: [1, 3].into(),
            },
            ..Default::default()
        };
        let kept = filter_rows(&rows, &params);
        assert_eq!(names(&kept), vec!["Le Bernardin", "Noma", "Bistro Japonais"]);
        assert!(kept.iter().all(|r| r.star_numeric != Some(2)));
        assert!(kept.iter().all(|r| r.award != Some(Award::BibGourmand)));
    }

    #[test]
    fn test_award_type_bib_gourmand() {
        let rows = sample();
        let params = FilterParams {
            award: AwardFilter::ByType {
                award_type: AwardType::BibGourmand,
                star_counts: BTreeSet::new(),
            },
            ..Default::default()
        };
        assert_eq!(names(&filter_rows(&rows, &params)), vec!["Taqueria Uno"]);
    }

    #[test]
    fn test_stars_with_no_counts_matches_nothing() {
        let rows = sample();
        let params = FilterParams {
            award: AwardFilter::ByType {
                award_type: AwardType::Stars,
                star_counts: BTreeSet::new(),
            },
            ..Default::default()
        };
        assert!(filter_rows(&rows, &params).is_empty());
    }

    #[test]
    fn test_price_range_excludes_missing_price() {
        let rows = sample();
        let params = FilterParams {
            price_range: Some(InclusiveRange::new(1, 4)),
            ..Default::default()
        };
        let kept = filter_rows(&rows, &params);
        assert_eq!(kept.len(), rows.len() - 1);
        assert!(!names(&kept).contains(&"Noma"));

        let params = FilterParams {
            price_range: Some(InclusiveRange::new(2, 3)),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_rows(&rows, &params)),
            vec!["Sukiyabashi", "Bistro Japonais", "Mystery"]
        );
    }

    #[test]
    fn test_indicator_ranges_are_inclusive() {
        let rows = sample();
        let params = FilterParams {
            gdp_range: Some(InclusiveRange::new(35000.0, 60000.0)),
            household_spending_range: Some(InclusiveRange::new(200_000.0, 2_800_000.0)),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_rows(&rows, &params)),
            vec!["Sukiyabashi", "Noma", "Bistro Japonais", "Mystery"]
        );
    }

    #[test]
    fn test_filter_is_idempotent_and_subset() {
        let rows = sample();
        let params = FilterParams {
            country_contains: "a".to_string(),
            award: AwardFilter::Labels([Award::OneStar, Award::TwoStars].into()),
            gdp_range: Some(InclusiveRange::new(0.0, 50000.0)),
            ..Default::default()
        };
        let once = filter_rows(&rows, &params);
        let twice = filter_rows(&once, &params);
        assert_eq!(once, twice);

        let indices = filtered_indices(&rows, &params);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert!(once.iter().all(|r| rows.contains(r)));
    }

    #[test]
    fn test_empty_result_is_distinct_from_unconstrained() {
        let rows = sample();
        let params = FilterParams {
            name_contains: "nothing matches this".to_string(),
            ..Default::default()
        };
        assert!(!params.is_unconstrained());
        assert!(filter_rows(&rows, &params).is_empty());
    }
}
